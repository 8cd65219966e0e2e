/// Interaction mode of a UI element. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UIState {
    #[default]
    Normal,
    Hover,
    Active,
    Disabled,
    Hidden,
}
