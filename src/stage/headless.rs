use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::{FrameSample, Motion};
use crate::error::EffectError;
use crate::layout::Scene;
use super::host::SceneHost;
use super::style::{ContainerStyle, DepthStyle};

/// Handle to an element in a [`HeadlessHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessNode(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Container,
    Definitions,
    Balloon,
}

struct Node {
    kind: NodeKind,
    parent: Option<HeadlessNode>,
    attached: bool,
    children: Vec<HeadlessNode>,
    markup: String,
    style: ContainerStyle,
    depth: Option<DepthStyle>,
    size: Scene,
}

struct Running {
    node: HeadlessNode,
    motion: Motion,
    started_at: f64,
    on_finish: Box<dyn FnOnce()>,
}

struct HeadlessState {
    viewport: Scene,
    nodes: Vec<Node>,
    root: Vec<HeadlessNode>,
    frames: Vec<Box<dyn FnOnce()>>,
    running: Vec<Running>,
    motions: Vec<(HeadlessNode, Motion, f64)>,
    clock_ms: f64,
    fail_play: bool,
}

/// In-memory element tree with a manually driven frame queue and clock
#[derive(Clone)]
pub struct HeadlessHost {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessHost {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                viewport: Scene::new(width, height),
                nodes: Vec::new(),
                root: Vec::new(),
                frames: Vec::new(),
                running: Vec::new(),
                motions: Vec::new(),
                clock_ms: 0.0,
                fail_play: false,
            })),
        }
    }

    /// Add a caller-owned container of the given size under the document root
    pub fn create_container(&self, width: f64, height: f64) -> HeadlessNode {
        let mut state = self.state.borrow_mut();
        let node = state.insert(None, NodeKind::Container, String::new());
        state.node_mut(node).size = Scene::new(width, height);
        state.root.push(node);
        node
    }

    /// Make every later `play` fail, as if animations were unsupported
    pub fn set_fail_play(&self, fail: bool) {
        self.state.borrow_mut().fail_play = fail;
    }

    /// Run the callbacks queued for the next frame; returns how many ran
    pub fn run_frame(&self) -> usize {
        let frames = std::mem::take(&mut self.state.borrow_mut().frames);
        let count = frames.len();
        for frame in frames {
            frame();
        }
        count
    }

    /// Move the clock forward, firing finish callbacks in completion order
    pub fn advance(&self, ms: f64) {
        let finished = {
            let mut state = self.state.borrow_mut();
            state.clock_ms += ms;
            let now = state.clock_ms;

            let (mut done, pending): (Vec<Running>, Vec<Running>) = state
                .running
                .drain(..)
                .partition(|r| now - r.started_at >= r.motion.total_ms());
            state.running = pending;
            done.sort_by(|a, b| {
                (a.started_at + a.motion.total_ms()).total_cmp(&(b.started_at + b.motion.total_ms()))
            });
            done
        };

        for run in finished {
            (run.on_finish)();
        }
    }

    /// Advance just far enough for every running motion to finish
    pub fn finish_all(&self) {
        let remaining = {
            let state = self.state.borrow();
            state
                .running
                .iter()
                .map(|r| r.started_at + r.motion.total_ms() - state.clock_ms)
                .fold(0.0, f64::max)
        };
        self.advance(remaining);
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn running_count(&self) -> usize {
        self.state.borrow().running.len()
    }

    /// Elements attached directly under the document root
    pub fn root_children(&self) -> Vec<HeadlessNode> {
        self.state.borrow().root.clone()
    }

    pub fn children(&self, node: HeadlessNode) -> Vec<HeadlessNode> {
        self.state.borrow().node(node).children.clone()
    }

    /// Attached children of `node` with the given kind
    pub fn children_of_kind(&self, node: HeadlessNode, kind: NodeKind) -> Vec<HeadlessNode> {
        let state = self.state.borrow();
        state
            .node(node)
            .children
            .iter()
            .copied()
            .filter(|child| state.node(*child).kind == kind)
            .collect()
    }

    pub fn is_attached(&self, node: HeadlessNode) -> bool {
        self.state.borrow().node(node).attached
    }

    pub fn style(&self, node: HeadlessNode, property: &str) -> Option<String> {
        self.state
            .borrow()
            .node(node)
            .style
            .get(property)
            .map(str::to_string)
    }

    pub fn markup(&self, node: HeadlessNode) -> String {
        self.state.borrow().node(node).markup.clone()
    }

    pub fn depth(&self, node: HeadlessNode) -> Option<DepthStyle> {
        self.state.borrow().node(node).depth
    }

    /// Motion started on `node`, if any
    pub fn motion(&self, node: HeadlessNode) -> Option<Motion> {
        self.state
            .borrow()
            .motions
            .iter()
            .find(|(n, _, _)| *n == node)
            .map(|(_, motion, _)| motion.clone())
    }

    /// Current pose of a playing balloon
    pub fn pose(&self, node: HeadlessNode) -> Option<FrameSample> {
        let state = self.state.borrow();
        state
            .motions
            .iter()
            .find(|(n, _, _)| *n == node)
            .map(|(_, motion, started_at)| motion.sample(state.clock_ms - started_at))
    }

    fn append(
        &self,
        container: &HeadlessNode,
        kind: NodeKind,
        markup: &str,
    ) -> Result<HeadlessNode, EffectError> {
        let mut state = self.state.borrow_mut();
        if !state.node(*container).attached {
            return Err(EffectError::Dom("container is not attached".to_string()));
        }
        let node = state.insert(Some(*container), kind, markup.to_string());
        state.node_mut(*container).children.push(node);
        Ok(node)
    }
}

impl HeadlessState {
    fn insert(&mut self, parent: Option<HeadlessNode>, kind: NodeKind, markup: String) -> HeadlessNode {
        let handle = HeadlessNode(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            attached: true,
            children: Vec::new(),
            markup,
            style: ContainerStyle::default(),
            depth: None,
            size: self.viewport,
        });
        handle
    }

    fn node(&self, node: HeadlessNode) -> &Node {
        &self.nodes[node.0]
    }

    fn node_mut(&mut self, node: HeadlessNode) -> &mut Node {
        &mut self.nodes[node.0]
    }

    fn detach(&mut self, node: HeadlessNode) {
        if !self.node(node).attached {
            return;
        }
        self.node_mut(node).attached = false;
        match self.node(node).parent {
            Some(parent) => self.node_mut(parent).children.retain(|c| *c != node),
            None => self.root.retain(|c| *c != node),
        }
    }
}

impl SceneHost for HeadlessHost {
    type Container = HeadlessNode;
    type Element = HeadlessNode;

    fn viewport(&self) -> Result<Scene, EffectError> {
        Ok(self.state.borrow().viewport)
    }

    fn create_overlay(&self, style: &ContainerStyle) -> Result<HeadlessNode, EffectError> {
        let mut state = self.state.borrow_mut();
        let node = state.insert(None, NodeKind::Container, String::new());
        state.node_mut(node).style = style.clone();
        state.root.push(node);
        Ok(node)
    }

    fn prepare_container(
        &self,
        container: &HeadlessNode,
        style: &ContainerStyle,
    ) -> Result<Scene, EffectError> {
        let mut state = self.state.borrow_mut();
        let node = state.node_mut(*container);
        node.style.declarations.extend(style.declarations.iter().cloned());
        Ok(node.size)
    }

    fn append_definitions(
        &self,
        container: &HeadlessNode,
        markup: &str,
    ) -> Result<HeadlessNode, EffectError> {
        self.append(container, NodeKind::Definitions, markup)
    }

    fn append_balloon(
        &self,
        container: &HeadlessNode,
        markup: &str,
    ) -> Result<HeadlessNode, EffectError> {
        self.append(container, NodeKind::Balloon, markup)
    }

    fn apply_depth(&self, element: &HeadlessNode, depth: &DepthStyle) -> Result<(), EffectError> {
        self.state.borrow_mut().node_mut(*element).depth = Some(*depth);
        Ok(())
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<(), EffectError> {
        self.state.borrow_mut().frames.push(callback);
        Ok(())
    }

    fn play(
        &self,
        element: &HeadlessNode,
        motion: &Motion,
        on_finish: Box<dyn FnOnce()>,
    ) -> Result<(), EffectError> {
        let mut state = self.state.borrow_mut();
        if state.fail_play {
            return Err(EffectError::Environment("animations unsupported".to_string()));
        }
        let started_at = state.clock_ms;
        state.motions.push((*element, motion.clone(), started_at));
        state.running.push(Running {
            node: *element,
            motion: motion.clone(),
            started_at,
            on_finish,
        });
        Ok(())
    }

    fn remove_element(&self, element: &HeadlessNode) {
        let mut state = self.state.borrow_mut();
        state.detach(*element);
        state.running.retain(|r| r.node != *element);
    }

    fn remove_container(&self, container: &HeadlessNode) {
        self.state.borrow_mut().detach(*container);
    }
}
