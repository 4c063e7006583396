//! End-to-end runs through real child processes and the fake toolkit scripts.

#![cfg(unix)]

mod common;

use std::sync::Arc;

use common::{listing, Fixture};
use convection_maps::{PipelineConfig, Stages};
use darn_common::PipelineWarning;
use test_utils::{fake_rst_toolkit, read_invocations, FAKE_RST_LOG};

fn config(fx: &Fixture) -> PipelineConfig {
    let bin = fake_rst_toolkit(&fx.dirs.bin);
    let mut config = PipelineConfig::default();
    config.rst.bin_dir = Some(bin);
    config.rst.env.insert(
        FAKE_RST_LOG.to_string(),
        fx.tmp.path().join("calls.log").display().to_string(),
    );
    config
}

#[tokio::test]
async fn test_run_produces_map_and_images() {
    let mut fx = Fixture::new();
    fx.params.image_ext = "png".to_string();
    fx.params.num_proc = 4;
    fx.data_file("20170301.0000.00.sas.fitacf", b"sas records");
    fx.data_file("20170301.0000.00.kap.fitacf.bz2", b"kap records");
    fx.data_file("20170301.0000.00.han.stereo.fitacf", b"han records");
    fx.data_file("20170301.0000.00.pgr.broken.fitacf", b"bad records");

    let config = config(&fx);
    let runner = Arc::new(config.runner());
    let mut maps = fx.pipeline_with(runner, config);
    let report = maps
        .run(Stages {
            plots: true,
            cleanup: false,
        })
        .await
        .unwrap();

    assert_eq!(report.radars_used, vec!["han", "kap", "sas"]);
    assert_eq!(report.radars_errors, vec!["pgr"]);
    assert!(matches!(
        report.warnings.as_slice(),
        [PipelineWarning::GridFailed { reason, .. }] if reason.contains("value of 3")
    ));

    let grid = std::fs::read_to_string(fx.dirs.grid.join("20170301.han.n.grid")).unwrap();
    // dmapdump reports channels 1 and 2 in the stereo file
    assert!(grid.contains("-cn_fix a -cn_fix b"), "{}", grid);

    let map = std::fs::read_to_string(fx.dirs.map.join("20170301.n.map")).unwrap();
    assert!(map.starts_with("map_fit "));

    assert_eq!(
        report.images,
        vec![
            fx.dirs.plot.join("20170301.0000.00.png"),
            fx.dirs.plot.join("20170301.0002.00.png"),
        ]
    );
    for image in &report.images {
        assert!(image.exists());
    }

    let calls = read_invocations(&fx.tmp.path().join("calls.log"));
    assert!(calls.iter().any(|c| c.starts_with("bzip2 -df ")));
    assert_eq!(calls.iter().filter(|c| c.starts_with("make_grid")).count(), 4);
}

#[tokio::test]
async fn test_run_with_cleanup_leaves_products() {
    let fx = Fixture::new();
    fx.data_file("20170301.0000.00.sas.fitacf", b"sas records");

    let config = config(&fx);
    let runner = Arc::new(config.runner());
    let mut maps = fx.pipeline_with(runner, config);
    maps.run(Stages::default()).await.unwrap();

    assert_eq!(listing(&fx.dirs.map), vec!["20170301.n.map"]);
    assert!(listing(&fx.dirs.grid).is_empty());
    assert!(listing(&fx.dirs.plot)
        .iter()
        .all(|name| name.ends_with(".ps") || name.ends_with(".pdf")));
}

#[tokio::test]
async fn test_maps_only_skips_plotting() {
    let fx = Fixture::new();
    fx.data_file("20170301.0000.00.sas.fitacf", b"sas records");

    let config = config(&fx);
    let runner = Arc::new(config.runner());
    let mut maps = fx.pipeline_with(runner, config);
    let report = maps
        .run(Stages {
            plots: false,
            cleanup: true,
        })
        .await
        .unwrap();

    assert!(report.images.is_empty());
    assert!(report.map_file.is_some());
    let calls = read_invocations(&fx.tmp.path().join("calls.log"));
    assert!(!calls.iter().any(|c| c.starts_with("map_plot")));
}
