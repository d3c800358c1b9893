pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unknown query operation: {name}.")]
	UnknownOperation { name: String },
	#[error("Invalid arguments for query operation {name}: {message}")]
	InvalidArguments { name: String, message: String },
}
