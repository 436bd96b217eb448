use std::fmt;

use aqi::Pollutant;
use catalog::SortBy;
use layers::legend::BandFilter;
use serde::Serialize;

use crate::view::{ViewState, ViewType};

pub const DEFAULT_THRESHOLD: f64 = 30.0;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Immutable snapshot of the dashboard's UI state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub theme: Theme,
    pub menu_open: bool,
    pub active_layer: Pollutant,
    /// Id of the data point shown in the detail panel.
    pub selected_location: Option<String>,
    /// Province mesh key that is selected on the globe.
    pub active_mesh: Option<String>,
    pub active_filter: Option<BandFilter>,
    pub sort_by: SortBy,
    pub camera_reset_pending: bool,
    pub view: ViewState,
    pub view_type: ViewType,
    pub threshold: f64,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            menu_open: false,
            active_layer: Pollutant::Pm25,
            selected_location: None,
            active_mesh: None,
            active_filter: None,
            sort_by: SortBy::default(),
            camera_reset_pending: false,
            view: ViewState::initial(),
            view_type: ViewType::Bird,
            threshold: DEFAULT_THRESHOLD,
            loading: false,
            error: None,
        }
    }
}

impl AppState {
    /// Whether the province mesh `name` is the selected one.
    pub fn is_active(&self, name: &str) -> bool {
        self.active_mesh.as_deref() == Some(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ToggleTheme,
    ToggleMenu,
    SetMenuOpen(bool),
    SetActiveLayer(Pollutant),
    SelectLocation(Option<String>),
    SetActiveMesh(Option<String>),
    SetActiveFilter(Option<BandFilter>),
    ToggleSort,
    RequestCameraReset,
    CameraResetDone,
    SetView(ViewType),
    SetThreshold(f64),
    DataLoading,
    DataLoaded,
    DataFailed(String),
    ClearError,
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::ToggleTheme => "toggle_theme",
            Action::ToggleMenu => "toggle_menu",
            Action::SetMenuOpen(_) => "set_menu_open",
            Action::SetActiveLayer(_) => "set_active_layer",
            Action::SelectLocation(_) => "select_location",
            Action::SetActiveMesh(_) => "set_active_mesh",
            Action::SetActiveFilter(_) => "set_active_filter",
            Action::ToggleSort => "toggle_sort",
            Action::RequestCameraReset => "request_camera_reset",
            Action::CameraResetDone => "camera_reset_done",
            Action::SetView(_) => "set_view",
            Action::SetThreshold(_) => "set_threshold",
            Action::DataLoading => "data_loading",
            Action::DataLoaded => "data_loaded",
            Action::DataFailed(_) => "data_failed",
            Action::ClearError => "clear_error",
        }
    }
}

fn or_none<T: fmt::Display>(v: &Option<T>) -> String {
    v.as_ref().map_or_else(|| "none".to_string(), |v| v.to_string())
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SetMenuOpen(open) => write!(f, "{} {open}", self.kind()),
            Action::SetActiveLayer(p) => write!(f, "{} {p}", self.kind()),
            Action::SelectLocation(id) => write!(f, "{} {}", self.kind(), or_none(id)),
            Action::SetActiveMesh(key) => write!(f, "{} {}", self.kind(), or_none(key)),
            Action::SetActiveFilter(filter) => write!(f, "{} {}", self.kind(), or_none(filter)),
            Action::SetView(view) => write!(f, "{} {view}", self.kind()),
            Action::SetThreshold(t) => write!(f, "{} {t}", self.kind()),
            Action::DataFailed(msg) => write!(f, "{} {msg}", self.kind()),
            _ => f.write_str(self.kind()),
        }
    }
}

/// Pure transition. Invalid payloads (a non-finite or negative threshold)
/// leave the state unchanged.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::ToggleTheme => next.theme = state.theme.toggled(),
        Action::ToggleMenu => next.menu_open = !state.menu_open,
        Action::SetMenuOpen(open) => next.menu_open = open,
        Action::SetActiveLayer(p) => next.active_layer = p,
        Action::SelectLocation(id) => next.selected_location = id,
        Action::SetActiveMesh(key) => next.active_mesh = key,
        Action::SetActiveFilter(filter) => next.active_filter = filter,
        Action::ToggleSort => next.sort_by = state.sort_by.toggled(),
        Action::RequestCameraReset => {
            next.camera_reset_pending = true;
            next.active_mesh = None;
        }
        Action::CameraResetDone => next.camera_reset_pending = false,
        Action::SetView(view) => {
            next.view_type = view;
            next.view = state.view.with_preset(view);
        }
        Action::SetThreshold(t) => {
            if t.is_finite() && t >= 0.0 {
                next.threshold = t;
            }
        }
        Action::DataLoading => {
            next.loading = true;
            next.error = None;
        }
        Action::DataLoaded => next.loading = false,
        Action::DataFailed(msg) => {
            next.loading = false;
            next.error = Some(msg);
        }
        Action::ClearError => next.error = None,
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqi::SeverityTier;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let s = AppState::default();
        assert_eq!(s.theme, Theme::Light);
        assert_eq!(s.active_layer, Pollutant::Pm25);
        assert_eq!(s.threshold, 30.0);
        assert_eq!(s.view_type, ViewType::Bird);
        assert!(!s.menu_open && !s.camera_reset_pending);
    }

    #[test]
    fn reduce_does_not_mutate_input() {
        let before = AppState::default();
        let snapshot = before.clone();
        let after = reduce(&before, Action::ToggleTheme);
        assert_eq!(before, snapshot);
        assert_eq!(after.theme, Theme::Dark);
        assert_eq!(reduce(&after, Action::ToggleTheme).theme, Theme::Light);
    }

    #[test]
    fn reduce_is_deterministic() {
        let s = AppState::default();
        let a = Action::SetActiveMesh(Some("Ha_Noi".into()));
        assert_eq!(reduce(&s, a.clone()), reduce(&s, a));
    }

    #[test]
    fn active_mesh_and_camera_reset() {
        let s = reduce(&AppState::default(), Action::SetActiveMesh(Some("Ha_Noi".into())));
        assert!(s.is_active("Ha_Noi"));
        assert!(!s.is_active("Da_Nang"));
        let s = reduce(&s, Action::RequestCameraReset);
        assert!(s.camera_reset_pending);
        assert!(s.active_mesh.is_none());
        let s = reduce(&s, Action::CameraResetDone);
        assert!(!s.camera_reset_pending);
    }

    #[test]
    fn menu_filter_and_sort() {
        let s = reduce(&AppState::default(), Action::ToggleMenu);
        assert!(s.menu_open);
        let s = reduce(&s, Action::SetMenuOpen(false));
        assert!(!s.menu_open);

        let filter = BandFilter::new(Pollutant::Pm10, SeverityTier::Moderate);
        let s = reduce(&s, Action::SetActiveFilter(Some(filter)));
        assert_eq!(s.active_filter, Some(filter));
        let s = reduce(&s, Action::SetActiveFilter(None));
        assert_eq!(s.active_filter, None);

        let s = reduce(&s, Action::ToggleSort);
        assert_eq!(s.sort_by, SortBy::Id);
    }

    #[test]
    fn set_view_applies_preset_angles() {
        let s = reduce(&AppState::default(), Action::SetView(ViewType::TopDown));
        assert_eq!(s.view_type, ViewType::TopDown);
        assert_eq!((s.view.pitch, s.view.bearing), (0.0, 0.0));
        assert_eq!(s.view.longitude, 105.8419);
    }

    #[test]
    fn invalid_threshold_is_ignored() {
        let s = reduce(&AppState::default(), Action::SetThreshold(55.0));
        assert_eq!(s.threshold, 55.0);
        assert_eq!(reduce(&s, Action::SetThreshold(f64::NAN)).threshold, 55.0);
        assert_eq!(reduce(&s, Action::SetThreshold(-1.0)).threshold, 55.0);
    }

    #[test]
    fn load_lifecycle() {
        let s = reduce(&AppState::default(), Action::DataLoading);
        assert!(s.loading);
        let s = reduce(&s, Action::DataFailed("network down".into()));
        assert!(!s.loading);
        assert_eq!(s.error.as_deref(), Some("network down"));
        let s = reduce(&s, Action::DataLoading);
        assert_eq!(s.error, None);
        let s = reduce(&s, Action::DataLoaded);
        assert!(!s.loading);
    }

    #[test]
    fn actions_describe_themselves() {
        assert_eq!(Action::SetActiveLayer(Pollutant::No2).to_string(), "set_active_layer no2");
        assert_eq!(Action::SetActiveMesh(None).to_string(), "set_active_mesh none");
        assert_eq!(Action::ToggleSort.to_string(), "toggle_sort");
    }
}
