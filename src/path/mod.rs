/// Command-string path interpreter.
pub mod interpreter;
