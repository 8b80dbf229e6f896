pub mod artifacts;
pub mod backup;
pub mod deploy;
pub mod dynamo_local;
pub mod go_build;
pub mod lambda;
pub mod package;
pub mod settings;
pub mod shell;
pub mod storage_key;
pub mod store;
pub mod terraform;
pub mod viber;
