//! One module per subcommand.

pub mod init;
pub mod sync;
pub mod visualize;
