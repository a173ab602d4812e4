pub mod push;
pub mod rebase;
