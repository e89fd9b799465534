// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Particle background installation.
//!
//! The global `particlesJS` entry point is looked up at install time, which
//! [`install_when_due`] holds back for [`LIBRARY_WAIT_MS`] after page start.
//! When it and the `#particles-js` container both exist, the portfolio
//! configuration is handed over as a plain JS object. Otherwise CSS
//! particles are added to the hero section.
//!
//! [`LIBRARY_WAIT_MS`]: unveil_core::particles::LIBRARY_WAIT_MS

use alloc::string::ToString as _;

use js_sys::{Function, JSON, Math, Reflect};
use unveil_core::particles::{
    Background, CONTAINER_ID, FALLBACK_CONTAINER_STYLE, FALLBACK_COUNT, LibraryWait,
    ParticlesConfig, css_particles, fallback_keyframes,
};
use unveil_core::time::HostTime;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;

use crate::DomDocument;

/// Name of the particle library's global entry point.
pub const ENTRY_POINT: &str = "particlesJS";

fn entry_point() -> Option<Function> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(ENTRY_POINT))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// The portfolio configuration as a JS object.
pub fn config_object(config: &ParticlesConfig) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    JSON::parse(&json)
}

/// Installs the particle background and reports which one was used.
pub fn install(dom: &DomDocument) -> Result<Background, JsValue> {
    let container = dom.document().get_element_by_id(CONTAINER_ID);
    let entry = entry_point();
    let background = Background::choose(container.is_some(), entry.is_some());
    match (background, entry) {
        (Background::Library, Some(entry)) => {
            let config = config_object(&ParticlesConfig::portfolio())?;
            entry.call2(&JsValue::NULL, &JsValue::from_str(CONTAINER_ID), &config)?;
        }
        _ => install_css_particles(dom)?,
    }
    Ok(background)
}

/// Installs the background on the first frame after `wait` runs out.
///
/// Returns the background chosen on that frame and `None` on every other.
pub fn install_when_due(
    wait: &mut LibraryWait,
    dom: &DomDocument,
    now: HostTime,
) -> Result<Option<Background>, JsValue> {
    if wait.take_due(now) {
        install(dom).map(Some)
    } else {
        Ok(None)
    }
}

/// Adds the CSS fallback particles to `.hero-section`, if there is one.
pub fn install_css_particles(dom: &DomDocument) -> Result<(), JsValue> {
    let Some(hero) = dom.find(".hero-section") else {
        return Ok(());
    };

    let container = dom.create("div")?;
    container.set_class_name("css-particles");
    container.set_attribute("style", FALLBACK_CONTAINER_STYLE)?;
    for particle in css_particles(FALLBACK_COUNT, Math::random) {
        let el = dom.create("div")?;
        el.set_class_name("particle");
        el.set_attribute("style", &particle.style())?;
        container.append_child(&el)?;
    }

    let keyframes = dom.create("style")?;
    keyframes.set_text_content(Some(&fallback_keyframes(Math::random() * 100.0 - 50.0)));
    if let Some(head) = dom.document().head() {
        head.append_child(&keyframes)?;
    }

    hero.insert_before(&container, hero.first_child().as_ref())?;
    Ok(())
}
