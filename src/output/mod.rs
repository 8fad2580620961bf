// Output formatting — terminal display for run summaries.

pub mod terminal;
