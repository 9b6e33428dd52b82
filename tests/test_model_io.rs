use std::fs;
use std::path::PathBuf;

use phrasedep::train::{ModelWriter, Trainer};
use phrasedep::Model;

fn feats(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

fn temp_model_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("phrasedep_{}_{}.bin", name, std::process::id()))
}

fn trained_scorer() -> phrasedep::Scorer {
    let mut trainer = Trainer::new(4);
    trainer.params_mut().set_max_iterations(20).unwrap();
    trainer.params_mut().set_shuffle_seed(Some(42));
    trainer.append(feats(&["ST_w_cat", "N0_w_sat"]), 0).unwrap();
    trainer.append(feats(&["ST_w_cat", "N0_w_mat"]), 2).unwrap();
    trainer.append(feats(&["ST_w_dog", "N0_w_ran"]), 3).unwrap();
    trainer.append(feats(&["ST_w_dog", "N0_w_sat"]), 1).unwrap();
    trainer.train().unwrap()
}

#[test]
fn test_write_then_read_round_trip() {
    let scorer = trained_scorer();
    let path = temp_model_path("round_trip");
    ModelWriter::write(&path, &scorer).unwrap();

    let buf = fs::read(&path).unwrap();
    let model = Model::new(&buf).unwrap();

    assert_eq!(model.num_classes(), 4);

    // Every non-zero feature row survives with its exact weights
    for (feature, row) in scorer.iter() {
        if row.iter().all(|&w| w == 0.0) {
            continue;
        }
        let fid = model
            .to_feature_id(feature)
            .unwrap_or_else(|| panic!("feature {} missing from model", feature));
        assert_eq!(model.to_feature(fid), Some(feature));
        for (class, &weight) in row.iter().enumerate() {
            assert_eq!(model.weight(fid, class as u32).unwrap(), weight);
        }
    }

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_model_prediction_parity() {
    let scorer = trained_scorer();
    let path = temp_model_path("parity");
    ModelWriter::write(&path, &scorer).unwrap();

    let buf = fs::read(&path).unwrap();
    let model = Model::new(&buf).unwrap();

    let inputs = vec![
        feats(&["ST_w_cat", "N0_w_sat"]),
        feats(&["ST_w_cat", "N0_w_mat"]),
        feats(&["ST_w_dog", "N0_w_ran"]),
        feats(&["ST_w_dog", "N0_w_sat"]),
        feats(&["never_seen"]),
    ];
    for input in &inputs {
        assert_eq!(model.predict(input).unwrap(), scorer.predict(input));
        assert_eq!(model.scores(input).unwrap(), scorer.scores(input));
    }

    // An in-memory scorer materialized from the model predicts identically
    let restored = model.scorer().unwrap();
    for input in &inputs {
        assert_eq!(restored.predict(input), scorer.predict(input));
    }

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_model_dump_lists_features() {
    let scorer = trained_scorer();
    let path = temp_model_path("dump");
    ModelWriter::write(&path, &scorer).unwrap();

    let buf = fs::read(&path).unwrap();
    let model = Model::new(&buf).unwrap();

    let mut out = Vec::new();
    model.dump(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("FILEHEADER"));
    assert!(text.contains("ST_w_cat"));
    assert!(text.contains("N0_w_ran"));

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_rejects_truncated_buffer() {
    let scorer = trained_scorer();
    let path = temp_model_path("truncated");
    ModelWriter::write(&path, &scorer).unwrap();

    let buf = fs::read(&path).unwrap();
    assert!(Model::new(&buf[..16]).is_err());
    // A buffer cut before the feature dictionary leaves off_features
    // dangling past the end
    assert!(Model::new(&buf[..40]).is_err());

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_rejects_foreign_magic() {
    let scorer = trained_scorer();
    let path = temp_model_path("magic");
    ModelWriter::write(&path, &scorer).unwrap();

    let mut buf = fs::read(&path).unwrap();
    buf[0..4].copy_from_slice(b"XXXX");
    assert!(Model::new(&buf).is_err());

    fs::remove_file(&path).unwrap();
}
