//! Sizefit WASM - WebAssembly bindings for Sizefit
//!
//! This crate exposes the sizefit-core target-size compressor to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `compress` - Target-size WebP compression bindings
//! - `types` - WASM-compatible wrapper for the encoded result
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_to_target, output_file_name } from '@sizefit/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_to_target(bytes, 1.5, undefined, undefined, undefined,
//!   (percent, status) => console.log(percent, status));
//! const blob = new Blob([result.bytes], { type: 'image/webp' });
//! console.log(`${output_file_name(file.name)}: ${result.size} bytes at q=${result.quality}`);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod types;

pub use compress::{compress_to_target, output_file_name};
pub use types::JsEncodedArtifact;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
