//! Built-in probe table.
//!
//! Each probe is an independent test evaluated once while the registry is
//! built. Probes only read the host through `Utilities`; none of them looks
//! at another probe's flag. A `HostError` escaping a probe means
//! "unsupported" and is absorbed by `run_probe`.

use crate::host::{HostError, SVG_NAMESPACE};
use crate::utilities::Utilities;

/// Key written by the storage self-test; removed before the probe returns.
pub const STORAGE_TEST_KEY: &str = "featurejs-test";
const STORAGE_TEST_VALUE: &str = "foobar";

/// Stable flag names for the built-in probes.
pub mod names {
    pub const CSS_3D_TRANSFORM: &str = "css3Dtransform";
    pub const CSS_TRANSFORM: &str = "cssTransform";
    pub const CSS_TRANSITION: &str = "cssTransition";
    pub const ADD_EVENT_LISTENER: &str = "addEventListener";
    pub const QUERY_SELECTOR_ALL: &str = "querySelectorAll";
    pub const MATCH_MEDIA: &str = "matchMedia";
    pub const DEVICE_MOTION: &str = "deviceMotion";
    pub const DEVICE_ORIENTATION: &str = "deviceOrientation";
    pub const CONTEXT_MENU: &str = "contextMenu";
    pub const CLASS_LIST: &str = "classList";
    pub const PLACEHOLDER: &str = "placeholder";
    pub const LOCAL_STORAGE: &str = "localStorage";
    pub const HISTORY_API: &str = "historyAPI";
    pub const SERVICE_WORKER: &str = "serviceWorker";
    pub const VIEWPORT_UNIT: &str = "viewportUnit";
    pub const REM_UNIT: &str = "remUnit";
    pub const CANVAS: &str = "canvas";
    pub const SVG: &str = "svg";
    pub const WEBGL: &str = "webGL";
    pub const CORS: &str = "cors";
    pub const TOUCH: &str = "touch";
    pub const ASYNC: &str = "async";
    pub const DEFER: &str = "defer";
    pub const GEOLOCATION: &str = "geolocation";
    pub const SRCSET: &str = "srcset";
    pub const SIZES: &str = "sizes";
    pub const PICTURE_ELEMENT: &str = "pictureElement";
    /// Never probed by default; only present once extended.
    pub const WEB_WORKER: &str = "webWorker";
}

pub type ProbeResult = Result<bool, HostError>;

pub struct ProbeSpec {
    pub name: &'static str,
    pub run: fn(&Utilities) -> ProbeResult,
}

/// Built-in probes in registry order.
pub const BUILTIN_PROBES: &[ProbeSpec] = &[
    ProbeSpec { name: names::CSS_3D_TRANSFORM, run: css_3d_transform },
    ProbeSpec { name: names::CSS_TRANSFORM, run: css_transform },
    ProbeSpec { name: names::CSS_TRANSITION, run: css_transition },
    ProbeSpec { name: names::ADD_EVENT_LISTENER, run: add_event_listener },
    ProbeSpec { name: names::QUERY_SELECTOR_ALL, run: query_selector_all },
    ProbeSpec { name: names::MATCH_MEDIA, run: match_media },
    ProbeSpec { name: names::DEVICE_MOTION, run: device_motion },
    ProbeSpec { name: names::DEVICE_ORIENTATION, run: device_orientation },
    ProbeSpec { name: names::CONTEXT_MENU, run: context_menu },
    ProbeSpec { name: names::CLASS_LIST, run: class_list },
    ProbeSpec { name: names::PLACEHOLDER, run: placeholder },
    ProbeSpec { name: names::LOCAL_STORAGE, run: local_storage },
    ProbeSpec { name: names::HISTORY_API, run: history_api },
    ProbeSpec { name: names::SERVICE_WORKER, run: service_worker },
    ProbeSpec { name: names::VIEWPORT_UNIT, run: viewport_unit },
    ProbeSpec { name: names::REM_UNIT, run: rem_unit },
    ProbeSpec { name: names::CANVAS, run: canvas },
    ProbeSpec { name: names::SVG, run: svg },
    ProbeSpec { name: names::WEBGL, run: webgl },
    ProbeSpec { name: names::CORS, run: cors },
    ProbeSpec { name: names::TOUCH, run: touch },
    ProbeSpec { name: names::ASYNC, run: script_async },
    ProbeSpec { name: names::DEFER, run: script_defer },
    ProbeSpec { name: names::GEOLOCATION, run: geolocation },
    ProbeSpec { name: names::SRCSET, run: srcset },
    ProbeSpec { name: names::SIZES, run: sizes },
    ProbeSpec { name: names::PICTURE_ELEMENT, run: picture_element },
];

/// Run one probe, translating host failures into "unsupported".
pub fn run_probe(spec: &ProbeSpec, utils: &Utilities) -> bool {
    (spec.run)(utils).unwrap_or(false)
}

fn css_3d_transform(utils: &Utilities) -> ProbeResult {
    Ok(!utils.is_legacy_device() && utils.prefixed("perspective").is_some())
}

fn css_transform(utils: &Utilities) -> ProbeResult {
    Ok(!utils.is_legacy_device() && utils.prefixed("transformOrigin").is_some())
}

fn css_transition(utils: &Utilities) -> ProbeResult {
    Ok(utils.prefixed("transition").is_some())
}

fn add_event_listener(utils: &Utilities) -> ProbeResult {
    Ok(utils.host().has_global("addEventListener"))
}

fn query_selector_all(utils: &Utilities) -> ProbeResult {
    Ok(utils.host().document_has("querySelectorAll"))
}

fn match_media(utils: &Utilities) -> ProbeResult {
    Ok(utils.host().has_global("matchMedia"))
}

fn device_motion(utils: &Utilities) -> ProbeResult {
    Ok(utils.host().has_global("DeviceMotionEvent"))
}

fn device_orientation(utils: &Utilities) -> ProbeResult {
    Ok(utils.host().has_global("DeviceOrientationEvent"))
}

fn context_menu(utils: &Utilities) -> ProbeResult {
    let host = utils.host();
    Ok(host.document_element_has("contextMenu") && host.has_global("HTMLMenuItemElement"))
}

fn class_list(utils: &Utilities) -> ProbeResult {
    Ok(utils.host().document_element_has("classList"))
}

fn placeholder(utils: &Utilities) -> ProbeResult {
    Ok(utils.create("input").has_property("placeholder"))
}

fn local_storage(utils: &Utilities) -> ProbeResult {
    let Some(storage) = utils.host().local_storage() else {
        return Ok(false);
    };

    // Counted before the self-test so a leftover test key never reads as data.
    let existing = storage.len();
    let round_trip = || -> Result<Option<String>, HostError> {
        storage.set_item(STORAGE_TEST_KEY, STORAGE_TEST_VALUE)?;
        let read = storage.get_item(STORAGE_TEST_KEY)?;
        storage.remove_item(STORAGE_TEST_KEY)?;
        Ok(read)
    };

    match round_trip() {
        Ok(read) => Ok(read.is_some_and(|value| !value.is_empty())),
        Err(_) => {
            let _ = storage.remove_item(STORAGE_TEST_KEY);
            // An empty store could not be written at all; a non-empty one
            // just ran over its quota.
            Ok(existing? > 0)
        }
    }
}

fn history_api(utils: &Utilities) -> ProbeResult {
    Ok(utils.host().history_has("pushState"))
}

fn service_worker(utils: &Utilities) -> ProbeResult {
    Ok(utils.host().navigator_has("serviceWorker"))
}

fn unit_sticks(utils: &Utilities, value: &str) -> ProbeResult {
    let mut el = utils.create("dummy");
    el.style_mut().set_width(value)?;
    Ok(!el.style().width().is_empty())
}

fn viewport_unit(utils: &Utilities) -> ProbeResult {
    unit_sticks(utils, "1vw")
}

fn rem_unit(utils: &Utilities) -> ProbeResult {
    unit_sticks(utils, "1rem")
}

fn canvas(utils: &Utilities) -> ProbeResult {
    let mut el = utils.create("canvas");
    Ok(el.has_property("getContext") && el.context("2d")?)
}

fn svg(utils: &Utilities) -> ProbeResult {
    let host = utils.host();
    if !host.document_has("createElementNS") {
        return Ok(false);
    }
    Ok(host
        .create_element_ns(SVG_NAMESPACE, "svg")
        .has_property("createSVGRect"))
}

fn webgl(utils: &Utilities) -> ProbeResult {
    if !utils.host().has_global("WebGLRenderingContext") {
        return Ok(false);
    }
    let mut el = utils.create("canvas");
    Ok(el.context("webgl")? || el.context("experimental-webgl")?)
}

fn cors(utils: &Utilities) -> ProbeResult {
    Ok(utils
        .host()
        .instantiate("XMLHttpRequest")
        .is_some_and(|xhr| xhr.has_property("withCredentials")))
}

/// Touch events are exposed; says nothing about an actual touchscreen.
fn touch(utils: &Utilities) -> ProbeResult {
    let host = utils.host();
    let ontouchstart = host.has_global("ontouchstart");
    let ms_gesture = host.navigator_flag("msPointerEnabled") && host.has_global("MSGesture");
    let document_touch =
        host.has_global("DocumentTouch") && host.document_is_instance_of("DocumentTouch");
    Ok(ontouchstart || ms_gesture || document_touch)
}

fn script_async(utils: &Utilities) -> ProbeResult {
    Ok(utils.create("script").has_property("async"))
}

fn script_defer(utils: &Utilities) -> ProbeResult {
    Ok(utils.create("script").has_property("defer"))
}

fn geolocation(utils: &Utilities) -> ProbeResult {
    Ok(utils.host().navigator_has("geolocation"))
}

fn srcset(utils: &Utilities) -> ProbeResult {
    Ok(utils.create("img").has_property("srcset"))
}

fn sizes(utils: &Utilities) -> ProbeResult {
    Ok(utils.create("img").has_property("sizes"))
}

fn picture_element(utils: &Utilities) -> ProbeResult {
    Ok(utils.host().has_global("HTMLPictureElement"))
}
