mod destroy;
pub mod helpers;
mod init;
mod plan;
mod run;
mod status;

pub use destroy::execute_destroy;
pub use init::execute_init;
pub use plan::execute_plan;
pub use run::execute_run;
pub use status::execute_status;
