//! Human-readable support report.
//!
//! The report keeps its own fixed list of flags and labels instead of walking
//! the registry, so it only depends on flag names staying stable.

use crate::probes::names;
use crate::registry::Registry;
use std::fmt;

/// Flags listed by the report, with their display labels.
pub const REPORTED_FLAGS: &[(&str, &str)] = &[
    (names::ADD_EVENT_LISTENER, "AddEventListener"),
    (names::ASYNC, "Async attribute"),
    (names::CANVAS, "Canvas"),
    (names::CLASS_LIST, "ClassList API"),
    (names::CORS, "CORS API"),
    (names::CONTEXT_MENU, "Context Menu"),
    (names::CSS_3D_TRANSFORM, "CSS 3D transform"),
    (names::CSS_TRANSFORM, "CSS transform"),
    (names::CSS_TRANSITION, "CSS transition"),
    (names::DEFER, "Defer attribute"),
    (names::DEVICE_ORIENTATION, "DeviceOrientation"),
    (names::DEVICE_MOTION, "DeviceMotion"),
    (names::GEOLOCATION, "Geolocation"),
    (names::HISTORY_API, "History API"),
    (names::PLACEHOLDER, "Input Placeholder"),
    (names::LOCAL_STORAGE, "LocalStorage"),
    (names::MATCH_MEDIA, "MatchMedia"),
    (names::PICTURE_ELEMENT, "Picture element"),
    (names::QUERY_SELECTOR_ALL, "QuerySelectorAll"),
    (names::REM_UNIT, "REM Units"),
    (names::SERVICE_WORKER, "Service Worker"),
    (names::SIZES, "Sizes attribute"),
    (names::SRCSET, "Srcset attribute"),
    (names::SVG, "SVG"),
    (names::TOUCH, "Touch"),
    (names::VIEWPORT_UNIT, "Viewport Units"),
    (names::WEBGL, "WebGL"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub flag: &'static str,
    pub label: &'static str,
    pub supported: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub lines: Vec<ReportLine>,
    /// Every reported flag plus `webWorker` is set.
    pub all_supported: bool,
}

impl Report {
    pub fn from_registry(registry: &Registry) -> Self {
        let lines = REPORTED_FLAGS
            .iter()
            .map(|&(flag, label)| ReportLine {
                flag,
                label,
                supported: registry.supports(flag),
            })
            .collect::<Vec<_>>();
        let all_supported =
            lines.iter().all(|line| line.supported) && registry.supports(names::WEB_WORKER);
        Self {
            lines,
            all_supported,
        }
    }

    pub fn supported_count(&self) -> usize {
        self.lines.iter().filter(|line| line.supported).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            if line.supported {
                writeln!(f, "yes  {} supported", line.label)?;
            } else {
                writeln!(f, "no   {} not supported by your browser!", line.label)?;
            }
        }
        write!(
            f,
            "{}/{} supported{}",
            self.supported_count(),
            self.lines.len(),
            if self.all_supported { " (all)" } else { "" }
        )
    }
}
