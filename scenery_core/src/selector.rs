use crate::variation::VariationSet;

/// Role of the user looking at the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerRole {
    GameMaster,
    Player,
}

impl ViewerRole {
    pub fn is_gm(self) -> bool {
        matches!(self, ViewerRole::GameMaster)
    }
}

/// The host renderer as seen by the display selector.
pub trait Canvas {
    type Error;

    /// Points the live background at `image` without touching the GPU.
    fn set_background(&mut self, image: &str);

    /// Loads the image resource so the next draw can use it.
    fn load_texture(&mut self, image: &str) -> Result<(), Self::Error>;

    /// Redraws the whole canvas.
    fn redraw(&mut self) -> Result<(), Self::Error>;
}

/// Image the given role should see, or `None` when the host default applies.
pub fn resolve(set: Option<&VariationSet>, role: ViewerRole) -> Option<&str> {
    let set = set?;
    let file = match role {
        ViewerRole::GameMaster => set.gm_selection.file.as_str(),
        ViewerRole::Player => set.pl_selection.file.as_str(),
    };
    (!file.is_empty()).then_some(file)
}

/// Swaps the canvas background to `image`.
///
/// With `redraw` unset only the background pointer moves; the caller is about
/// to draw anyway. With `redraw` set the image is loaded first, and a load
/// failure leaves the current background in place.
pub fn apply<C: Canvas + ?Sized>(canvas: &mut C, image: &str, redraw: bool) -> Result<(), C::Error> {
    if !redraw {
        canvas.set_background(image);
        return Ok(());
    }
    canvas.load_texture(image)?;
    canvas.set_background(image);
    canvas.redraw()
}
