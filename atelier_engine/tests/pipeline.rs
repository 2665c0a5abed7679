use std::time::Duration;

use atelier_assets::{
    AddressingMode, AssetBatchSpec, Material, MemoryFetcher, ShaderFamily, SubAssetSpec,
    TextureChannel,
};
use atelier_engine::{BatchOutcome, Orchestrator, PipelineConfig};
use atelier_physics::PickingVolume;
use atelier_scene::Scene;

const CHAIR_OBJ: &str = "\
o seat
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 1 3 4
o back
v 0 0 1
v 2 0 1
v 2 3 1
f 5 6 7
";

const STOOL_OBJ: &str = "\
o stool
v 0 0 0
v 1 0 0
v 0 2 0
f 1 2 3
";

const WOODEN_CHAIR_OBJ: &str = "\
mtllib chair.mtl
o seat
v 0 0 0
v 1 0 0
v 1 1 0
usemtl wood
f 1 2 3
o back
v 0 0 1
v 2 0 1
v 2 3 1
usemtl wood
f 4 5 6
";

const CHAIR_MTL: &str = "\
newmtl wood
Kd 0.5 0.3 0.1
";

const BASE: &str = "https://drive.google.com/uc?export=download";

fn png() -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 200, 10, 255]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn config() -> PipelineConfig {
    PipelineConfig {
        tick_ms: 10,
        ..Default::default()
    }
}

fn direct(name: &str, url: &str, sub_assets: Vec<SubAssetSpec>) -> AssetBatchSpec {
    AssetBatchSpec {
        name: name.to_string(),
        url: url.to_string(),
        addressing: AddressingMode::Direct,
        sub_assets,
        ..Default::default()
    }
}

const MS: Duration = Duration::from_millis(1);

#[tokio::test(start_paused = true)]
async fn test_single_sub_asset_with_base_color() {
    let fetcher = MemoryFetcher::new()
        .with_payload("https://assets.test/stool.obj", STOOL_OBJ, MS * 20)
        .with_payload("https://assets.test/stool_albedo.png", png(), MS * 40);
    let orchestrator = Orchestrator::new(fetcher, config());

    let batch = direct("stool", "https://assets.test/stool.obj", vec![
        SubAssetSpec::new("stool")
            .with_channel(TextureChannel::BaseColor, "https://assets.test/stool_albedo.png"),
    ]);
    let outcome = orchestrator.enqueue(batch).await.unwrap();
    let report = outcome.report().unwrap();

    assert_eq!(report.bound_sub_assets, vec![0]);
    assert_eq!(report.skipped_channels, 5);
    assert_eq!(report.nodes, 2);
    let bounds = report.bounds.unwrap();
    assert_eq!(bounds.max, glam::Vec3::new(1.0, 2.0, 0.0));

    let mut scene = orchestrator.scene().lock().unwrap();
    assert_eq!(scene.parent(report.root), None);
    assert_eq!(scene.roots(), vec![report.root]);
    assert!(scene.get::<PickingVolume>(report.root).is_some());

    let stool = scene.children(report.root)[0];
    assert!(scene.get::<PickingVolume>(stool).is_some());
    let material = scene.get::<Material>(stool).unwrap();
    assert_eq!(material.family, ShaderFamily::Standard);
    assert_eq!(
        material.bound_channels().collect::<Vec<_>>(),
        vec![TextureChannel::BaseColor]
    );
    assert_eq!(material.smoothness, None);
    assert_eq!(orchestrator.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_textures_do_not_block_assembly() {
    let fetcher = MemoryFetcher::new()
        .with_payload("https://assets.test/chair.obj", CHAIR_OBJ, MS * 5)
        .with_payload("https://assets.test/seat_metal.png", png(), MS * 5)
        .with_status("https://assets.test/seat_normal.png", 500, MS * 5)
        .with_unreachable("https://assets.test/back_albedo.png", MS * 5)
        .with_payload("https://assets.test/back_height.png", "not a png", MS * 5);
    let orchestrator = Orchestrator::new(fetcher, config());

    let batch = direct("chair", "https://assets.test/chair.obj", vec![
        SubAssetSpec::new("seat")
            .with_channel(TextureChannel::Metallic, "https://assets.test/seat_metal.png")
            .with_channel(TextureChannel::Normal, "https://assets.test/seat_normal.png"),
        SubAssetSpec::new("back")
            .with_channel(TextureChannel::BaseColor, "https://assets.test/back_albedo.png")
            .with_channel(TextureChannel::Height, "https://assets.test/back_height.png"),
    ]);
    let outcome = orchestrator.enqueue(batch).await.unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.bound_sub_assets, vec![0, 1]);
    assert_eq!(report.skipped_channels, 11);
    assert_eq!(report.nodes, 3);

    let scene = orchestrator.scene().lock().unwrap();
    let children = scene.children(report.root);
    let seat = scene.get::<Material>(children[0]).unwrap();
    assert_eq!(
        seat.bound_channels().collect::<Vec<_>>(),
        vec![TextureChannel::Metallic]
    );
    assert_eq!(seat.smoothness, Some(0.0));
    let back = scene.get::<Material>(children[1]).unwrap();
    assert_eq!(back.bound_count(), 0);
    assert_eq!(back.base_color_factor, glam::Vec4::ONE);
}

#[tokio::test(start_paused = true)]
async fn test_missing_model_creates_nothing() {
    let fetcher = MemoryFetcher::new()
        .with_unreachable("https://assets.test/lamp.obj", MS * 15)
        .with_payload("https://assets.test/lamp.png", png(), MS);
    let orchestrator = Orchestrator::new(fetcher, config());
    assert_eq!(orchestrator.in_flight(), 0);

    let lamp = SubAssetSpec::default()
        .with_channel(TextureChannel::BaseColor, "https://assets.test/lamp.png");
    let handle = orchestrator.enqueue(direct("lamp", "https://assets.test/lamp.obj", vec![lamp]));
    assert_eq!(orchestrator.in_flight(), 1);

    assert_eq!(handle.await.unwrap(), BatchOutcome::ObjectMissing);
    assert_eq!(orchestrator.in_flight(), 0);
    let mut scene = orchestrator.scene().lock().unwrap();
    assert_eq!(scene.node_count(), 0);
    assert!(scene.names().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_companion_material_is_missing_object() {
    let fetcher = MemoryFetcher::new()
        .with_payload("https://assets.test/chair.obj", CHAIR_OBJ, MS)
        .with_status("https://assets.test/chair.mtl", 403, MS);
    let orchestrator = Orchestrator::new(fetcher, config());
    let batch = AssetBatchSpec {
        companion_material: true,
        material_url: "https://assets.test/chair.mtl".to_string(),
        ..direct("chair", "https://assets.test/chair.obj", vec![])
    };
    assert_eq!(
        orchestrator.enqueue(batch).await.unwrap(),
        BatchOutcome::ObjectMissing
    );
    assert_eq!(orchestrator.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_companion_material_sets_defaults() {
    let fetcher = MemoryFetcher::new()
        .with_payload("https://assets.test/chair.obj", WOODEN_CHAIR_OBJ, MS)
        .with_payload("https://assets.test/chair.mtl", CHAIR_MTL, MS);
    let orchestrator = Orchestrator::new(fetcher, config());
    let batch = AssetBatchSpec {
        companion_material: true,
        material_url: "https://assets.test/chair.mtl".to_string(),
        ..direct("chair", "https://assets.test/chair.obj", vec![])
    };
    let outcome = orchestrator.enqueue(batch).await.unwrap();
    let report = outcome.report().unwrap();
    let scene = orchestrator.scene().lock().unwrap();
    let seat = scene.children(report.root)[0];
    let material = scene.get::<Material>(seat).unwrap();
    assert!((material.base_color_factor.x - 0.5).abs() < 1e-6);
}

fn chair_with_textures() -> AssetBatchSpec {
    direct("chair", "https://assets.test/chair.obj", vec![
        SubAssetSpec::new("seat")
            .with_channel(TextureChannel::BaseColor, "https://assets.test/seat.png"),
        SubAssetSpec::new("back")
            .with_channel(TextureChannel::BaseColor, "https://assets.test/back.png"),
    ])
}

fn has_base_color(scene: &mut Scene, name: &str) -> bool {
    let entity = scene.find(name).unwrap();
    scene
        .get::<Material>(entity)
        .is_some_and(|material| material.texture(TextureChannel::BaseColor).is_some())
}

#[tokio::test(start_paused = true)]
async fn test_later_sub_asset_waits_for_earlier_one() {
    let fetcher = MemoryFetcher::new()
        .with_payload("https://assets.test/chair.obj", CHAIR_OBJ, MS)
        .with_payload("https://assets.test/seat.png", png(), MS * 500)
        .with_payload("https://assets.test/back.png", png(), MS);
    let orchestrator = Orchestrator::new(fetcher, config());
    let handle = orchestrator.enqueue(chair_with_textures());

    // back.png has arrived, seat.png has not
    tokio::time::sleep(MS * 100).await;
    {
        let mut scene = orchestrator.scene().lock().unwrap();
        assert!(!has_base_color(&mut scene, "seat"));
        assert!(!has_base_color(&mut scene, "back"));
    }
    assert!(!handle.is_finished());

    let outcome = handle.await.unwrap();
    assert_eq!(outcome.report().unwrap().bound_sub_assets, vec![0, 1]);
    let mut scene = orchestrator.scene().lock().unwrap();
    assert!(has_base_color(&mut scene, "seat"));
    assert!(has_base_color(&mut scene, "back"));
}

#[tokio::test(start_paused = true)]
async fn test_settled_sub_asset_is_live_while_sibling_stalls() {
    let fetcher = MemoryFetcher::new()
        .with_payload("https://assets.test/chair.obj", CHAIR_OBJ, MS)
        .with_payload("https://assets.test/seat.png", png(), MS)
        .with_payload("https://assets.test/back.png", png(), Duration::from_secs(3600));
    let orchestrator = Orchestrator::new(fetcher, config());
    let handle = orchestrator.enqueue(chair_with_textures());

    tokio::time::sleep(Duration::from_secs(5)).await;
    {
        let mut scene = orchestrator.scene().lock().unwrap();
        assert_eq!(scene.node_count(), 3);
        assert!(has_base_color(&mut scene, "seat"));
        assert!(!has_base_color(&mut scene, "back"));
        let chair = scene.find("chair").unwrap();
        assert!(scene.parent(chair).is_some());
    }
    assert!(!handle.is_finished());
    assert_eq!(orchestrator.in_flight(), 1);
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn test_fetches_launch_eagerly() {
    let fetcher = MemoryFetcher::new()
        .with_payload("https://assets.test/chair.obj", CHAIR_OBJ, MS * 100)
        .with_payload("https://assets.test/seat.png", png(), MS * 100)
        .with_payload("https://assets.test/back.png", png(), MS * 100);
    let orchestrator = Orchestrator::new(fetcher, config());
    let batch = direct("chair", "https://assets.test/chair.obj", vec![
        SubAssetSpec::new("seat")
            .with_channel(TextureChannel::BaseColor, "https://assets.test/seat.png"),
        SubAssetSpec::new("back")
            .with_channel(TextureChannel::BaseColor, "https://assets.test/back.png"),
    ]);

    // Everything overlaps, so the batch takes about one fetch latency rather than three
    let start = tokio::time::Instant::now();
    orchestrator.enqueue(batch).await.unwrap();
    assert!(start.elapsed() < MS * 150);
}

#[tokio::test(start_paused = true)]
async fn test_share_links_are_rewritten() {
    let share = "https://drive.google.com/file/d/1XpFKqoCYw3YcPbcHhkbNo45pHBIrIbvL/view?usp=drive_link";
    let rewritten = format!("{BASE}&id=1XpFKqoCYw3YcPbcHhkbNo45pHBIrIbvL");
    let fetcher = MemoryFetcher::new()
        .with_payload(format!("{BASE}&id=chair-id"), CHAIR_OBJ, MS)
        .with_payload(rewritten.clone(), png(), MS);
    let orchestrator = Orchestrator::new(fetcher, config());
    let batch = AssetBatchSpec {
        name: "chair".to_string(),
        url: "chair-id".to_string(),
        addressing: AddressingMode::Indirect,
        sub_assets: vec![
            SubAssetSpec::new("seat").with_channel(TextureChannel::BaseColor, share),
            SubAssetSpec::new("back").with_channel(TextureChannel::BaseColor, share),
        ],
        ..Default::default()
    };

    for sub_asset in 0..2 {
        let resolved = orchestrator
            .locator()
            .resolve(
                atelier_assets::ResourceKind::Texture {
                    sub_asset,
                    channel: TextureChannel::BaseColor,
                },
                &batch,
            )
            .unwrap();
        assert!(!resolved.contains("view"));
        assert_eq!(resolved, rewritten);
    }

    let outcome = orchestrator.enqueue(batch).await.unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.skipped_channels, 10);
}

#[tokio::test(start_paused = true)]
async fn test_root_name_suffix_is_last_sub_asset_index() {
    let fetcher = MemoryFetcher::new()
        .with_payload("https://assets.test/chair.obj", CHAIR_OBJ, MS)
        .with_payload("https://assets.test/stool.obj", STOOL_OBJ, MS);
    let orchestrator = Orchestrator::new(fetcher, config());
    {
        let mut scene = orchestrator.scene().lock().unwrap();
        scene.add_anchor("chair");
        scene.add_anchor("stool");
    }

    let chair = orchestrator.enqueue(direct("chair", "https://assets.test/chair.obj", vec![
        SubAssetSpec::new("seat"),
        SubAssetSpec::new("back"),
    ]));
    let stool = orchestrator.enqueue(direct("stool", "https://assets.test/stool.obj", vec![]));
    let chair = chair.await.unwrap().report().unwrap().root;
    let stool = stool.await.unwrap().report().unwrap().root;

    let scene = orchestrator.scene().lock().unwrap();
    assert_eq!(scene.name(chair), Some("chair1"));
    assert_eq!(scene.name(stool), Some("stool0"));
}

#[tokio::test(start_paused = true)]
async fn test_same_name_batches_get_unique_names() {
    let fetcher = MemoryFetcher::new().with_payload("https://assets.test/chair.obj", CHAIR_OBJ, MS);
    let orchestrator = Orchestrator::new(fetcher, config());
    let first = orchestrator.enqueue(direct("chair", "https://assets.test/chair.obj", vec![]));
    let second = orchestrator.enqueue(direct("chair", "https://assets.test/chair.obj", vec![]));
    let first = first.await.unwrap();
    let second = second.await.unwrap();

    let mut scene = orchestrator.scene().lock().unwrap();
    let mut names: Vec<String> = [first, second]
        .iter()
        .flat_map(|outcome| {
            let root = outcome.report().unwrap().root;
            std::iter::once(root).chain(scene.children(root))
        })
        .filter_map(|entity| scene.name(entity).map(str::to_string))
        .collect();
    assert_eq!(names.len(), 6);
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 6);
    assert_eq!(scene.names().len(), 6);
    assert_eq!(scene.roots().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_batch_attaches_under_anchor() {
    let fetcher = MemoryFetcher::new().with_payload("https://assets.test/chair.obj", CHAIR_OBJ, MS);
    let orchestrator = Orchestrator::new(fetcher, config());
    let anchor = orchestrator.scene().lock().unwrap().add_anchor("showroom");

    let batch = AssetBatchSpec {
        parent: Some("showroom".to_string()),
        ..direct("chair", "https://assets.test/chair.obj", vec![])
    };
    let outcome = orchestrator.enqueue(batch).await.unwrap();
    let root = outcome.report().unwrap().root;

    let scene = orchestrator.scene().lock().unwrap();
    assert_eq!(scene.parent(root), Some(anchor));
    assert_eq!(scene.children(anchor), vec![root]);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_anchor_falls_back_to_root() {
    let fetcher = MemoryFetcher::new().with_payload("https://assets.test/chair.obj", CHAIR_OBJ, MS);
    let orchestrator = Orchestrator::new(fetcher, config());
    let batch = AssetBatchSpec {
        parent: Some("attic".to_string()),
        ..direct("chair", "https://assets.test/chair.obj", vec![])
    };
    let outcome = orchestrator.enqueue(batch).await.unwrap();
    let root = outcome.report().unwrap().root;
    assert_eq!(orchestrator.scene().lock().unwrap().parent(root), None);
}
