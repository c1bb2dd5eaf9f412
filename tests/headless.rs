//! End-to-end releases against the in-memory host

use std::cell::Cell;
use std::rc::Rc;

use balloon_release::random::Lcg;
use balloon_release::stage::{HeadlessHost, NodeKind, SvgBalloonFactory};
use balloon_release::{release, EffectConfig, Palette};

#[test]
fn overlay_release_leaves_document_unchanged() {
    let host = HeadlessHost::new(1280.0, 720.0);
    let before = host.root_children();

    let mut rng = Lcg::new(2024);
    let signal = release(&host, &SvgBalloonFactory, &mut rng, &EffectConfig::default(), None, None);

    assert_eq!(host.root_children().len(), before.len() + 1);
    host.run_frame();
    host.finish_all();

    assert_eq!(signal.outcome(), Some(Ok(())));
    assert_eq!(host.root_children(), before);
}

#[test]
fn balloons_leave_one_by_one() {
    let host = HeadlessHost::new(800.0, 600.0);
    let mut rng = Lcg::new(8);
    let signal = release(&host, &SvgBalloonFactory, &mut rng, &EffectConfig::default(), None, None);
    let overlay = host.root_children()[0];
    let balloons = host.children_of_kind(overlay, NodeKind::Balloon);
    host.run_frame();

    let fired = Rc::new(Cell::new(0));
    let f = fired.clone();
    signal.on_settle(move |_| f.set(f.get() + 1));

    let mut remaining = balloons.len();
    while remaining > 0 {
        host.advance(250.0);
        let now = host.children_of_kind(overlay, NodeKind::Balloon).len();
        assert!(now <= remaining);
        if now > 0 {
            assert_eq!(fired.get(), 0, "signal fired with {} balloons left", now);
        }
        remaining = now;
    }

    assert_eq!(fired.get(), 1);
    assert!(balloons.iter().all(|b| !host.is_attached(*b)));
}

#[test]
fn balloons_rise_during_flight() {
    let host = HeadlessHost::new(800.0, 600.0);
    let mut rng = Lcg::new(17);
    let _signal = release(&host, &SvgBalloonFactory, &mut rng, &EffectConfig::default(), None, None);
    let overlay = host.root_children()[0];
    let balloons = host.children_of_kind(overlay, NodeKind::Balloon);
    host.run_frame();

    for balloon in &balloons {
        let pose = host.pose(*balloon).unwrap();
        assert_eq!(pose.translate.y, 600.0);
        assert!(pose.translate.z <= 0.0);
    }

    host.advance(10_000.0);
    for balloon in &balloons {
        assert!(host.pose(*balloon).unwrap().translate.y < 600.0);
    }
}

#[test]
fn concurrent_releases_are_independent() {
    let host = HeadlessHost::new(800.0, 600.0);
    let config = EffectConfig::default();
    let mut rng = Lcg::new(1);

    let first = release(&host, &SvgBalloonFactory, &mut rng, &config, None, None);
    let second = release(&host, &SvgBalloonFactory, &mut rng, &config, None, None);
    assert_eq!(host.root_children().len(), 2);

    host.run_frame();
    host.finish_all();

    assert_eq!(first.outcome(), Some(Ok(())));
    assert_eq!(second.outcome(), Some(Ok(())));
    assert!(host.root_children().is_empty());
}

#[test]
fn yaml_config_and_palette() {
    let config = EffectConfig::from_yaml("layout:\n  min_balloons: 12\nstage:\n  blur_threshold: 10\n")
        .unwrap();
    let palette = Palette::from_yaml(r##"[["#f89640ee", "#eb002bff"]]"##).unwrap();

    let host = HeadlessHost::new(800.0, 600.0);
    let mut rng = Lcg::new(4);
    let _signal = release(&host, &SvgBalloonFactory, &mut rng, &config, None, Some(palette));
    let overlay = host.root_children()[0];
    let balloons = host.children_of_kind(overlay, NodeKind::Balloon);

    assert_eq!(balloons.len(), 12);
    let blurred = balloons
        .iter()
        .filter(|b| host.depth(**b).unwrap().blur_px.is_some())
        .count();
    assert_eq!(blurred, 2);
    assert!(balloons.iter().all(|b| host.markup(*b).contains("#eb002bff")));
}
