use std::rc::Rc;

use log::{debug, info, warn};

use crate::animation::Motion;
use crate::config::EffectConfig;
use crate::error::EffectError;
use crate::layout::{LayoutPlanner, Scene};
use crate::palette::Palette;
use crate::random::RandomSource;
use crate::stage::{BalloonFactory, ContainerStyle, DepthStyle, SceneHost};
use super::latch::FanIn;
use super::signal::CompletionSignal;

/// Container a release draws into
#[derive(Debug, Clone, PartialEq)]
pub enum SceneContainer<C> {
    /// Created by the release and removed when it ends
    Owned(C),
    /// Supplied by the caller; only its injected children are removed
    Adopted(C),
}

impl<C> SceneContainer<C> {
    pub fn element(&self) -> &C {
        match self {
            SceneContainer::Owned(c) | SceneContainer::Adopted(c) => c,
        }
    }
}

/// Everything a release mounted, so it can be torn down
#[derive(Clone)]
struct Mounted<H: SceneHost> {
    host: H,
    container: SceneContainer<H::Container>,
    definitions: Option<H::Element>,
    balloons: Vec<(H::Element, Motion)>,
}

impl<H: SceneHost> Mounted<H> {
    /// Remove the scene once every balloon has removed itself
    fn finish(&self) {
        match &self.container {
            SceneContainer::Owned(container) => self.host.remove_container(container),
            SceneContainer::Adopted(_) => {
                if let Some(definitions) = &self.definitions {
                    self.host.remove_element(definitions);
                }
            }
        }
    }

    /// Remove everything after a failure
    fn abort(&self) {
        for (balloon, _) in &self.balloons {
            self.host.remove_element(balloon);
        }
        self.finish();
    }
}

/// Release a set of balloons into `container`, or into a new full-viewport
/// overlay when none is given.
///
/// All layout, element creation and styling happen before this returns. The
/// motions start at the next frame; the returned signal resolves once every
/// balloon has finished and the scene has been cleaned up. Setup failures
/// tear down whatever was mounted and reject the signal.
pub fn release<H, F, R>(
    host: &H,
    factory: &F,
    rng: &mut R,
    config: &EffectConfig,
    container: Option<H::Container>,
    palette: Option<Palette>,
) -> CompletionSignal
where
    H: SceneHost,
    F: BalloonFactory + ?Sized,
    R: RandomSource + ?Sized,
{
    let signal = CompletionSignal::new();
    let palette = palette.unwrap_or_default();

    let (container, scene) = match resolve_container(host, config, container) {
        Ok(resolved) => resolved,
        Err(err) => {
            warn!("balloon release failed before mounting: {}", err);
            signal.reject(err);
            return signal;
        }
    };

    let mut mounted = Mounted {
        host: host.clone(),
        container,
        definitions: None,
        balloons: Vec::new(),
    };

    if let Err(err) = mount_balloons(&mut mounted, factory, rng, config, &palette, scene) {
        warn!("balloon release failed while mounting: {}", err);
        mounted.abort();
        signal.reject(err);
        return signal;
    }

    let leftovers = mounted.clone();
    let on_frame = {
        let signal = signal.clone();
        move || launch(mounted, signal)
    };
    if let Err(err) = host.request_frame(Box::new(on_frame)) {
        warn!("balloon release could not schedule a frame: {}", err);
        leftovers.abort();
        signal.reject(err);
    }

    signal
}

fn resolve_container<H: SceneHost>(
    host: &H,
    config: &EffectConfig,
    container: Option<H::Container>,
) -> Result<(SceneContainer<H::Container>, Scene), EffectError> {
    match container {
        Some(container) => {
            let scene = host.prepare_container(&container, &ContainerStyle::adopted(&config.stage))?;
            Ok((SceneContainer::Adopted(container), scene))
        }
        None => {
            let scene = host.viewport()?;
            let overlay = host.create_overlay(&ContainerStyle::overlay(&config.stage))?;
            Ok((SceneContainer::Owned(overlay), scene))
        }
    }
}

fn mount_balloons<H, F, R>(
    mounted: &mut Mounted<H>,
    factory: &F,
    rng: &mut R,
    config: &EffectConfig,
    palette: &Palette,
    scene: Scene,
) -> Result<(), EffectError>
where
    H: SceneHost,
    F: BalloonFactory + ?Sized,
    R: RandomSource + ?Sized,
{
    let plan = LayoutPlanner::new(config.layout).plan(scene, factory.reference_size(), rng);
    debug!(
        "planned {} balloons {:.0}x{:.0}px, depth {:.0}px, scene {:.0}x{:.0}px",
        plan.amount(),
        plan.balloon_size.width,
        plan.balloon_size.height,
        plan.max_depth,
        scene.width,
        scene.height
    );

    let host = mounted.host.clone();
    let container = mounted.container.element().clone();

    mounted.definitions = Some(host.append_definitions(&container, &factory.definitions())?);

    // Far to near: later balloons stack above earlier ones
    for (index, trajectory) in plan.trajectories.iter().enumerate() {
        let z_index = index as u32 + 1;
        let markup = factory.balloon(palette.pair_for(index), plan.balloon_size.width)?;
        let balloon = host.append_balloon(&container, &markup)?;
        let motion = Motion::for_balloon(trajectory, z_index, &config.motion, rng);
        mounted.balloons.push((balloon.clone(), motion));

        host.apply_depth(&balloon, &DepthStyle::for_stacking(z_index, &config.stage))?;
    }

    info!("releasing {} balloons", plan.amount());
    Ok(())
}

/// Start every motion; the last one to finish tears the scene down
fn launch<H: SceneHost>(mounted: Mounted<H>, signal: CompletionSignal) {
    let host = mounted.host.clone();
    let balloons = mounted.balloons.clone();
    let mounted = Rc::new(mounted);

    let latch = {
        let mounted = mounted.clone();
        let signal = signal.clone();
        FanIn::new(balloons.len(), move || {
            mounted.finish();
            signal.resolve();
        })
    };

    for (balloon, motion) in &balloons {
        let on_finish = {
            let host = host.clone();
            let balloon = balloon.clone();
            let latch = latch.clone();
            move || {
                host.remove_element(&balloon);
                latch.arrive();
            }
        };
        if let Err(err) = host.play(balloon, motion, Box::new(on_finish)) {
            warn!("balloon release failed to start motions: {}", err);
            mounted.abort();
            signal.reject(err);
            return;
        }
    }
}
