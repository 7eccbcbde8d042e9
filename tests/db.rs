use std::fs;
use std::sync::Arc;

use imretrieve::descriptor::*;
use imretrieve::*;
use rstest::*;

fn uniform(rgb: [u8; 3]) -> ColorImage {
    ColorImage::filled(32, 32, rgb)
}

fn gradient(seed: u8) -> ColorImage {
    ColorImage::from_fn(48, 40, |x, y| [(x * 5) as u8 ^ seed, (y * 6) as u8, seed.wrapping_mul(3)])
}

fn locators(records: &[&Record]) -> Vec<String> {
    records.iter().map(|r| r.locator().unwrap_or_default().to_string()).collect()
}

#[fixture]
fn rgb_db() -> ListDB {
    let mut db = ListDB::new(vec![DescriptorKind::SingleColor, DescriptorKind::DominantColor], DescriptorConfig::default());
    db.add_media(&uniform([255, 0, 0]), Some("red".to_string())).unwrap();
    db.add_media(&uniform([0, 255, 0]), Some("green".to_string())).unwrap();
    db.add_media(&uniform([0, 0, 255]), Some("blue".to_string())).unwrap();
    db
}

#[rstest]
fn uniform_image_has_one_dominant_color() {
    let descriptor = DescriptorFactory::default().create(DescriptorKind::DominantColor, &uniform([12, 34, 56])).unwrap();
    let AnyDescriptor::DominantColor(dcd) = descriptor else { panic!("unexpected descriptor") };
    assert_eq!(dcd.len(), 1);
    assert_eq!(dcd.get(0).unwrap().percentage(), 1.);
    assert_eq!(dcd.rgb(0), Some([12, 34, 56]));
}

#[rstest]
#[case::color_structure(DescriptorKind::ColorStructure)]
#[case::scalable_color(DescriptorKind::ScalableColor)]
#[case::gridded(DescriptorKind::Gridded)]
fn identical_images_have_zero_distance(#[case] kind: DescriptorKind) {
    let factory = DescriptorFactory::default();
    let a = factory.create(kind, &gradient(7)).unwrap();
    let b = factory.create(kind, &gradient(7)).unwrap();
    assert_eq!(a.compare(&b).unwrap(), Some(0.));
}

#[rstest]
#[case::red([250, 10, 10], "red")]
#[case::green([10, 250, 10], "green")]
#[case::blue([10, 10, 250], "blue")]
fn query_orders_by_color(rgb_db: ListDB, #[case] query: [u8; 3], #[case] expected: &str) {
    let q = rgb_db.record_from_media(&uniform(query), None).unwrap();
    let result = rgb_db.query(&q).unwrap();
    let mut found = locators(&result);
    assert_eq!(found[0], expected);
    found.sort();
    assert_eq!(found, vec!["blue", "green", "red"]);
}

#[test]
fn equal_distances_keep_insertion_order() {
    let mut db = ListDB::new(vec![DescriptorKind::SingleColor], DescriptorConfig::default());
    db.add_media(&uniform([0, 255, 0]), Some("green".to_string())).unwrap();
    db.add_media(&uniform([0, 0, 255]), Some("blue".to_string())).unwrap();
    db.add_media(&uniform([255, 0, 0]), Some("red".to_string())).unwrap();
    let q = db.record_from_media(&uniform([250, 10, 10]), None).unwrap();
    assert_eq!(locators(&db.query(&q).unwrap()), vec!["red", "green", "blue"]);
}

#[rstest]
fn schema_mismatch_is_rejected(mut rgb_db: ListDB) {
    let factory = DescriptorFactory::default();
    let record = Record::new(factory.create_list(&[DescriptorKind::SingleColor], &uniform([1, 2, 3])).unwrap(), None);
    match rgb_db.add(record.clone()) {
        Err(Error::SchemaIncompatible { expected, found }) => {
            assert_eq!(expected, vec![DescriptorKind::SingleColor, DescriptorKind::DominantColor]);
            assert_eq!(found, vec![DescriptorKind::SingleColor]);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(rgb_db.insert(0, record), Err(Error::SchemaIncompatible { .. })));
    assert_eq!(rgb_db.len(), 3);
}

#[test]
fn scalable_color_coefficients_must_match() {
    let img = gradient(3);
    let a = ScalableColorDescriptor::with_params(&img, 128, 0).unwrap();
    let b = ScalableColorDescriptor::with_params(&img, 256, 0).unwrap();
    assert_eq!(a.compare(&b).unwrap(), None);
    assert_eq!(AnyDescriptor::from(a).distance(&b.into()).unwrap(), f64::INFINITY);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
#[case(10)]
fn query_k_is_prefix_of_query(#[case] k: usize) {
    let mut db = ListDB::new(vec![DescriptorKind::ScalableColor, DescriptorKind::SingleColor], DescriptorConfig::default());
    for seed in 0..6u8 {
        db.add_media(&gradient(seed * 40), Some(seed.to_string())).unwrap();
    }
    let q = db.record_from_media(&gradient(90), None).unwrap();
    let all = db.query(&q).unwrap();
    let top = db.query_k(&q, k).unwrap();
    assert_eq!(locators(&top), locators(&all[..k.min(all.len())]));

    let metadata = db.query_metadata(&q).unwrap();
    assert!(metadata.windows(2).all(|w| w[0].distance <= w[1].distance));
}

#[test]
fn save_then_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.db");
    let schema = vec![
        DescriptorKind::SingleColor,
        DescriptorKind::DominantColor,
        DescriptorKind::ColorStructure,
        DescriptorKind::ScalableColor,
        DescriptorKind::Label,
        DescriptorKind::Gridded,
    ];
    let config = DescriptorConfig {
        dominant_color_comparator: DominantColorComparator { policy: DominantColorPolicy::SameCount, td: 0.5 },
        color_structure_levels: 64,
        scalable_color_coefficients: 64,
        grid_size: (3, 2),
        ..Default::default()
    };
    let mut db = ListDB::new(schema.clone(), config.clone());
    for seed in [5u8, 60, 120] {
        db.add_media(&gradient(seed), Some(format!("image-{}", seed))).unwrap();
    }
    db.save(&path).unwrap();

    let opened = ListDB::open(&path).unwrap();
    assert_eq!(opened.schema(), schema.as_slice());
    assert_eq!(opened.factory().config(), &config);
    assert_eq!(opened.len(), 3);

    let q = db.record_from_media(&gradient(60), None).unwrap();
    let before: Vec<_> = db.query_metadata(&q).unwrap().iter().map(|m| m.distance).collect();
    let after: Vec<_> = opened.query_metadata(&q).unwrap().iter().map(|m| m.distance).collect();
    assert_eq!(before, after);
    assert_eq!(opened.query_k(&q, 1).unwrap()[0].locator(), Some("image-60"));

    let stored = opened.get(2).unwrap();
    assert_eq!(opened.query_k(stored, 1).unwrap()[0].locator(), Some("image-120"));
}

#[test]
fn open_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(ListDB::open(dir.path().join("missing.db")), Err(Error::Io(_))));

    let garbage = dir.path().join("garbage.db");
    fs::write(&garbage, b"definitely not a database").unwrap();
    assert!(matches!(ListDB::open(&garbage), Err(Error::Decode(_))));

    let truncated = dir.path().join("truncated.db");
    let db = ListDB::new(vec![DescriptorKind::SingleColor], DescriptorConfig::default());
    db.save(&truncated).unwrap();
    let bytes = fs::read(&truncated).unwrap();
    fs::write(&truncated, &bytes[..bytes.len() - 1]).unwrap();
    assert!(ListDB::open(&truncated).is_err());
}

#[derive(Debug)]
struct FixedClassifier;

impl Classifier<ColorImage> for FixedClassifier {
    fn classify(&self, media: &ColorImage) -> LabeledClassification {
        let label = if media.pixel(0, 0)[0] > 127 { "warm" } else { "cold" };
        LabeledClassification { labels: vec![label.to_string()], weights: Some(vec![0.9]) }
    }
}

#[test]
fn custom_classifier() {
    let factory = DescriptorFactory::with_classifier(DescriptorConfig::default(), Arc::new(FixedClassifier));
    let mut db = ListDB::with_factory(vec![DescriptorKind::Label], factory.clone());
    db.add_media(&uniform([200, 0, 0]), Some("warm".to_string())).unwrap();
    db.add_media(&uniform([0, 0, 200]), Some("cold".to_string())).unwrap();

    let result = db.query_media(&uniform([255, 10, 10]), None).unwrap();
    assert_eq!(result[0].record.locator(), Some("warm"));
    assert_eq!(result[0].distance, 0.);
    assert_eq!(result[1].distance, f64::INFINITY);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.db");
    db.save(&path).unwrap();
    let opened = ListDB::open_with_factory(&path, factory).unwrap();
    let result = opened.query_media(&uniform([0, 0, 255]), Some(1)).unwrap();
    assert_eq!(result[0].record.locator(), Some("cold"));
}
