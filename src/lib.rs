// Library root
// -----------
// This crate exposes a small library surface for the sync CLI. The binary
// (`main.rs`) wires these modules together and runs one sync pass.
//
// Module responsibilities:
// - `config`: Runtime settings loaded from `config.env` / the environment,
//   held in an explicit struct that callers can override field by field.
// - `api`: Encapsulates HTTP interactions with the labeling server
//   (project creation, ML backend registration, image import).
// - `folders`: Filesystem side: patient folder pattern, image collection,
//   and moving processed folders into the imported archive.
// - `progress`: Upload progress reporting, decoupled from the sync logic
//   behind a small trait.
// - `sync`: The orchestrator that ties all of the above together.
//
// Keeping this separation makes the orchestrator testable against fakes
// (no live server needed) and leaves room to swap the console progress
// output for something else later.
pub mod api;
pub mod config;
pub mod folders;
pub mod progress;
pub mod sync;
