use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Animation, Document, Element, HtmlElement, Window};

use crate::animation::Motion;
use crate::error::EffectError;
use crate::layout::Scene;
use super::host::SceneHost;
use super::style::{ContainerStyle, DepthStyle};

#[wasm_bindgen]
extern "C" {
    /// Element seen through the Web Animations API
    #[wasm_bindgen(extends = Element)]
    type Animatable;

    /// `Element.animate`; throws where the Web Animations API is missing
    #[wasm_bindgen(catch, method, js_name = animate)]
    fn animate(this: &Animatable, keyframes: &Array, options: &Object) -> Result<Animation, JsValue>;
}

/// Browser document host backed by web-sys
#[derive(Clone)]
pub struct DomHost {
    window: Window,
    document: Document,
}

impl DomHost {
    /// Bind to the current window and document
    pub fn new() -> Result<Self, EffectError> {
        let window = web_sys::window()
            .ok_or_else(|| EffectError::Environment("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| EffectError::Environment("no document".to_string()))?;
        Ok(Self { window, document })
    }

    fn create_element(&self, tag: &str) -> Result<HtmlElement, EffectError> {
        self.document
            .create_element(tag)
            .map_err(EffectError::dom)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| EffectError::Dom(format!("<{}> is not an HTML element", tag)))
    }

    fn append_markup(
        &self,
        container: &HtmlElement,
        markup: &str,
    ) -> Result<HtmlElement, EffectError> {
        let wrapper = self.create_element("div")?;
        wrapper.set_inner_html(markup);
        container.append_child(&wrapper).map_err(EffectError::dom)?;
        Ok(wrapper)
    }
}

fn apply_style(element: &HtmlElement, style: &ContainerStyle) -> Result<(), EffectError> {
    let css = element.style();
    for (property, value) in &style.declarations {
        css.set_property(property, value).map_err(EffectError::dom)?;
    }
    Ok(())
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), EffectError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(EffectError::dom)
}

/// Web Animations keyframe list for a motion
fn keyframes_js(motion: &Motion) -> Result<Array, EffectError> {
    let frames = Array::new();
    for keyframe in &motion.keyframes {
        let frame = Object::new();
        set(&frame, "transform", &JsValue::from_str(&keyframe.css_transform()))?;
        set(&frame, "opacity", &JsValue::from_f64(keyframe.opacity))?;
        if let Some(offset) = keyframe.offset {
            set(&frame, "offset", &JsValue::from_f64(offset))?;
        }
        frames.push(&frame);
    }
    Ok(frames)
}

fn options_js(motion: &Motion) -> Result<Object, EffectError> {
    let options = Object::new();
    set(&options, "duration", &JsValue::from_f64(motion.duration_ms))?;
    set(&options, "delay", &JsValue::from_f64(motion.delay_ms))?;
    set(&options, "easing", &JsValue::from_str(&motion.easing.css()))?;
    // Wait at the start pose below the scene until launch
    set(&options, "fill", &JsValue::from_str("backwards"))?;
    Ok(options)
}

impl SceneHost for DomHost {
    type Container = HtmlElement;
    type Element = HtmlElement;

    fn viewport(&self) -> Result<Scene, EffectError> {
        let width = self.window.inner_width().map_err(EffectError::dom)?;
        let height = self.window.inner_height().map_err(EffectError::dom)?;
        Ok(Scene::new(
            width.as_f64().unwrap_or(0.0),
            height.as_f64().unwrap_or(0.0),
        ))
    }

    fn create_overlay(&self, style: &ContainerStyle) -> Result<HtmlElement, EffectError> {
        let root = self
            .document
            .document_element()
            .ok_or_else(|| EffectError::Environment("no document element".to_string()))?;
        let overlay = self.create_element("balloons")?;
        apply_style(&overlay, style)?;
        root.append_child(&overlay).map_err(EffectError::dom)?;
        Ok(overlay)
    }

    fn prepare_container(
        &self,
        container: &HtmlElement,
        style: &ContainerStyle,
    ) -> Result<Scene, EffectError> {
        apply_style(container, style)?;
        let rect = container.get_bounding_client_rect();
        Ok(Scene::new(rect.width(), rect.height()))
    }

    fn append_definitions(
        &self,
        container: &HtmlElement,
        markup: &str,
    ) -> Result<HtmlElement, EffectError> {
        self.append_markup(container, markup)
    }

    fn append_balloon(
        &self,
        container: &HtmlElement,
        markup: &str,
    ) -> Result<HtmlElement, EffectError> {
        let balloon = self.append_markup(container, markup)?;
        let css = balloon.style();
        for (property, value) in [
            ("position", "absolute"),
            ("left", "0"),
            ("top", "0"),
            ("will-change", "transform"),
        ] {
            css.set_property(property, value).map_err(EffectError::dom)?;
        }
        Ok(balloon)
    }

    fn apply_depth(&self, element: &HtmlElement, depth: &DepthStyle) -> Result<(), EffectError> {
        let css = element.style();
        css.set_property("z-index", &depth.z_index.to_string())
            .map_err(EffectError::dom)?;
        if let Some(filter) = depth.filter() {
            css.set_property("filter", &filter).map_err(EffectError::dom)?;
        }
        Ok(())
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<(), EffectError> {
        let callback = Closure::once_into_js(move || callback());
        self.window
            .request_animation_frame(callback.unchecked_ref::<Function>())
            .map(|_| ())
            .map_err(|e| EffectError::Environment(format!("requestAnimationFrame: {:?}", e)))
    }

    fn play(
        &self,
        element: &HtmlElement,
        motion: &Motion,
        on_finish: Box<dyn FnOnce()>,
    ) -> Result<(), EffectError> {
        let keyframes = keyframes_js(motion)?;
        let options = options_js(motion)?;
        let animation = element
            .unchecked_ref::<Animatable>()
            .animate(&keyframes, &options)
            .map_err(|e| EffectError::Environment(format!("Element.animate: {:?}", e)))?;

        let on_finish = Closure::once_into_js(move || on_finish());
        animation.set_onfinish(Some(on_finish.unchecked_ref::<Function>()));
        Ok(())
    }

    fn remove_element(&self, element: &HtmlElement) {
        element.remove();
    }

    fn remove_container(&self, container: &HtmlElement) {
        container.remove();
    }
}
