/// End-to-end tests against on-disk SQLite databases
mod persistence;
mod workflow;
