/// command-line task: flags, bindings, running an expression in the chosen domain
pub mod cli;
/// console and file logging setup
pub mod logger;
