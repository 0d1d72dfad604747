// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use framekit_core::cache::{cache_params, Cache, CACHE_NAME};
use framekit_core::FilterRegistry;

// Declare the top-level feature modules directly.
pub mod reorder;
pub mod source;

#[cfg(test)]
pub mod test_utils;

/// A single function to register all built-in nodes.
pub fn register_nodes(registry: &mut FilterRegistry) {
    registry.register_with_description(
        CACHE_NAME,
        cache_params(),
        Cache::create,
        "Remembers recently served frames of its input. Inserted automatically \
         in front of nodes that opt in to caching.",
    );

    // Call the registration function for each feature module.
    source::register_source_nodes(registry);
    reorder::register_reorder_nodes(registry);

    tracing::info!("Finished registering built-in nodes.");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtins_registered() {
        let mut registry = FilterRegistry::new();
        register_nodes(&mut registry);

        let names: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "BlankClip",
                "Cache",
                "DeleteFrames",
                "DuplicateFrames",
                "FreezeFrames",
                "Interleave",
                "Loop",
                "Reverse",
                "SelectEvery",
                "Splice",
                "Trim",
            ]
        );
    }

    #[test]
    fn test_definitions_expose_signatures() {
        let mut registry = FilterRegistry::new();
        register_nodes(&mut registry);

        let defs = registry.definitions();
        let trim = defs.iter().find(|d| d.name == "Trim").unwrap();
        assert_eq!(trim.signature, "clip:clip;first:int:opt;last:int:opt;length:int:opt;");
        let freeze = defs.iter().find(|d| d.name == "FreezeFrames").unwrap();
        assert_eq!(freeze.signature, "clip:clip;first:int[];last:int[];replacement:int[];");

        let json = serde_json::to_value(&defs).unwrap();
        assert!(json.as_array().unwrap().iter().all(|d| d["description"].is_string()));
    }
}
