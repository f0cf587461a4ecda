// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 解析编排器测试
///
/// 覆盖增量运行、目录清理、覆盖优先级、单页崩溃、周期检查点和中断后的持久性
#[cfg(test)]
mod tests {
    use crate::helpers::fake_browser::FakeRenderer;
    use crate::helpers::{css, page_url, read_checkpoint, use_case, RecordingStore};
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Notify;
    use wikimg::domain::models::catalog::Catalog;
    use wikimg::domain::models::resolution::{ResolutionResult, ResultMap};
    use wikimg::infrastructure::storage::{InMemoryCheckpointStore, JsonCheckpointStore};

    fn image(name: &str) -> String {
        format!("https://wiki.test/images/{}.png", name.replace(' ', "_"))
    }

    fn renderer_with_images(names: &[&str]) -> FakeRenderer {
        names.iter().fold(FakeRenderer::new(), |renderer, name| {
            let src = image(name);
            renderer.with_page(&page_url(name), &[("#infobox img", Some(src.as_str()))])
        })
    }

    #[tokio::test]
    async fn test_end_to_end_cull_then_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("images.json");
        std::fs::write(&checkpoint, r#"{"Ghost": "http://x/img.png"}"#).unwrap();

        // "removed_item" -> "Ghost" has been dropped from the current catalog
        let catalog = Catalog::from_entries([("sword", "Iron Sword")]);

        let renderer = Arc::new(renderer_with_images(&["Iron Sword"]));
        let store = Arc::new(RecordingStore::new(JsonCheckpointStore::new(&checkpoint, None)));
        let summary = use_case(renderer.clone(), store.clone(), vec![css("#infobox img")], 5)
            .run(&catalog, std::future::pending())
            .await
            .unwrap();

        let snapshots = store.snapshots();
        assert_eq!(snapshots.first(), Some(&ResultMap::new()));
        assert_eq!(read_checkpoint(&checkpoint), json!({"Iron Sword": image("Iron Sword")}));
        assert_eq!(summary.culled, 1);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.succeeded, 1);
        assert!(!summary.interrupted);
        assert_eq!(renderer.shutdowns(), 1);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("images.json");
        let catalog = Catalog::from_names(["Stone", "Dirt", "Ghost Block"]);

        let first = Arc::new(renderer_with_images(&["Stone", "Dirt"]));
        let store = Arc::new(JsonCheckpointStore::new(&checkpoint, None));
        use_case(first.clone(), store.clone(), vec![css("#infobox img")], 5)
            .run(&catalog, std::future::pending())
            .await
            .unwrap();
        let after_first = std::fs::read(&checkpoint).unwrap();
        assert_eq!(first.rendered().len(), 3);

        let second = Arc::new(renderer_with_images(&["Stone", "Dirt", "Ghost Block"]));
        let summary = use_case(second.clone(), store, vec![css("#infobox img")], 5)
            .run(&catalog, std::future::pending())
            .await
            .unwrap();

        assert!(second.rendered().is_empty());
        assert_eq!(summary.skipped, 3);
        assert_eq!(std::fs::read(&checkpoint).unwrap(), after_first);
        assert_eq!(
            read_checkpoint(&checkpoint),
            json!({"Dirt": image("Dirt"), "Ghost Block": false, "Stone": image("Stone")})
        );
    }

    #[tokio::test]
    async fn test_override_beats_checkpoint_and_is_not_rescraped() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("images.json");
        let overrides = dir.path().join("overrides.json");
        std::fs::write(&checkpoint, r#"{"Stone": "https://x/old.png", "Dirt": false}"#).unwrap();
        std::fs::write(&overrides, r#"{"Stone": "https://x/manual.png"}"#).unwrap();

        let renderer = Arc::new(FakeRenderer::new());
        let store = Arc::new(JsonCheckpointStore::new(&checkpoint, Some(overrides)));
        use_case(renderer.clone(), store, vec![css("#infobox img")], 5)
            .run(&Catalog::from_names(["Stone", "Dirt"]), std::future::pending())
            .await
            .unwrap();

        assert!(renderer.rendered().is_empty());
        assert_eq!(
            read_checkpoint(&checkpoint),
            json!({"Dirt": false, "Stone": "https://x/manual.png"})
        );
    }

    #[tokio::test]
    async fn test_navigation_failure_records_not_found_and_continues() {
        let renderer = Arc::new(renderer_with_images(&["Dirt"]));
        let store = Arc::new(InMemoryCheckpointStore::default());
        let summary = use_case(renderer.clone(), store.clone(), vec![css("#infobox img")], 5)
            .run(&Catalog::from_names(["Unknown Page", "Dirt"]), std::future::pending())
            .await
            .unwrap();

        let saved = store.snapshot().await;
        assert_eq!(saved.get("Unknown Page"), Some(&ResolutionResult::NotFound));
        assert_eq!(saved.get("Dirt"), Some(&ResolutionResult::ImageUrl(image("Dirt"))));
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(renderer.rendered(), vec![page_url("Unknown Page"), page_url("Dirt")]);
    }

    #[tokio::test]
    async fn test_panicking_page_records_not_found_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("images.json");
        let names = ["A", "Bad", "C", "D"];

        let renderer = Arc::new(renderer_with_images(&names).panic_on(&page_url("Bad")));
        let store = Arc::new(JsonCheckpointStore::new(&checkpoint, None));
        let summary = use_case(renderer.clone(), store, vec![css("#infobox img")], 5)
            .run(&Catalog::from_names(names), std::future::pending())
            .await
            .unwrap();

        assert_eq!(
            read_checkpoint(&checkpoint),
            json!({
                "A": image("A"),
                "Bad": false,
                "C": image("C"),
                "D": image("D")
            })
        );
        assert_eq!(summary.processed, 4);
        assert_eq!(summary.failed, 1);
        assert!(!summary.interrupted);
        assert_eq!(renderer.rendered().len(), 4);
        assert_eq!(renderer.shutdowns(), 1);
    }

    #[tokio::test]
    async fn test_checkpoint_every_five_entities() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("images.json");
        let names = ["A", "B", "C", "D", "E", "F"];

        let renderer = Arc::new(renderer_with_images(&names));
        let store = Arc::new(RecordingStore::new(JsonCheckpointStore::new(&checkpoint, None)));
        use_case(renderer, store.clone(), vec![css("#infobox img")], 5)
            .run(&Catalog::from_names(names), std::future::pending())
            .await
            .unwrap();

        let sizes: Vec<usize> = store.snapshots().iter().map(ResultMap::len).collect();
        assert_eq!(sizes, vec![0, 5, 6]);
    }

    #[tokio::test]
    async fn test_interrupt_keeps_every_recorded_entity() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("images.json");
        std::fs::write(&checkpoint, r#"{"Old": "https://x/old.png"}"#).unwrap();

        let names = ["Old", "A", "B", "C", "D", "E", "F", "G"];
        let signal = Arc::new(Notify::new());
        // Fourth render hangs and raises the interrupt, so three entities get recorded
        let renderer = Arc::new(renderer_with_images(&names).interrupt_on_render(3, signal.clone()));
        let store = Arc::new(JsonCheckpointStore::new(&checkpoint, None));

        let shutdown = async move { signal.notified().await };
        let summary = use_case(renderer.clone(), store, vec![css("#infobox img")], 5)
            .run(&Catalog::from_names(names), shutdown)
            .await
            .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.processed, 3);
        assert_eq!(renderer.shutdowns(), 1);
        assert_eq!(
            read_checkpoint(&checkpoint),
            json!({
                "A": image("A"),
                "B": image("B"),
                "C": image("C"),
                "Old": "https://x/old.png"
            })
        );
    }
}
