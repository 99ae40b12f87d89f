/// Actions an observer can take during golden section search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the search and report the better of the two points just compared.
    StopEarly,
}
