#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: i32,
    pub name: String,
    /// Price in minor currency units.
    pub price: i64,
    pub volume: i32,
    pub packing: bool,
    /// Prepared on the spot instead of being taken from the shelf.
    pub immediate: bool,
}
