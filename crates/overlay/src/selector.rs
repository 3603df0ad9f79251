use foundation::{LonLatBounds, OverlayToken, Sequence};
use tracing::{debug, info, warn};

use crate::catalog::DateCatalog;
use crate::source::WmsSource;
use crate::time_range::TimeRange;

/// Lifecycle of the dated imagery overlay.
///
/// Idle → Loading → Displayed | Errored, and back to Idle (or a fresh Loading)
/// on every date selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OverlayState {
    Idle,
    Loading,
    Displayed,
    Errored,
}

impl OverlayState {
    pub fn as_str(self) -> &'static str {
        match self {
            OverlayState::Idle => "idle",
            OverlayState::Loading => "loading",
            OverlayState::Displayed => "displayed",
            OverlayState::Errored => "errored",
        }
    }
}

/// One overlay acquisition handed to the tile service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRequest {
    pub token: OverlayToken,
    pub date_key: String,
    pub time_range: TimeRange,
}

impl OverlayRequest {
    /// WMS `GetMap` query parameters shared by every tile of this overlay.
    ///
    /// Per-tile `bbox` and `srs` are left to the tile service.
    pub fn tile_params(&self, source: &WmsSource) -> Vec<(&'static str, String)> {
        let size = source.tile_size.to_string();
        vec![
            ("service", "WMS".to_string()),
            ("request", "GetMap".to_string()),
            ("version", "1.1.1".to_string()),
            ("layers", source.layers.clone()),
            ("styles", String::new()),
            ("format", source.format.clone()),
            ("transparent", source.transparent.to_string()),
            ("time", self.time_range.to_string()),
            ("width", size.clone()),
            ("height", size),
        ]
    }
}

/// Side effects requested by the selector, in the order they must be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEffect {
    /// Remove the overlay with this token from the map.
    Release(OverlayToken),
    FitBounds(LonLatBounds),
    ShowLoader,
    HideLoader,
    /// Add a new overlay and start streaming its tiles.
    Request(OverlayRequest),
}

/// Owns the single active overlay.
///
/// Every call returns the effects to apply; the selector itself never talks to
/// the map. Tile signals carry the token of the request they belong to, and
/// signals for anything but the active request are dropped.
#[derive(Debug)]
pub struct OverlaySelector {
    catalog: DateCatalog,
    coverage: LonLatBounds,
    state: OverlayState,
    active: Option<OverlayRequest>,
    tokens: Sequence,
}

impl OverlaySelector {
    pub fn new(catalog: DateCatalog, coverage: LonLatBounds) -> Self {
        Self {
            catalog,
            coverage,
            state: OverlayState::Idle,
            active: None,
            tokens: Sequence::new(),
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn active(&self) -> Option<&OverlayRequest> {
        self.active.as_ref()
    }

    pub fn catalog(&self) -> &DateCatalog {
        &self.catalog
    }

    pub fn coverage(&self) -> LonLatBounds {
        self.coverage
    }

    /// Applies a date picker value. `None` and `""` both mean "no overlay".
    ///
    /// The previous overlay is always released first, even when the same date
    /// is selected again.
    pub fn select_date(&mut self, date_key: Option<&str>) -> Vec<OverlayEffect> {
        let previous = self.state;
        let mut effects = Vec::new();

        if let Some(old) = self.active.take() {
            debug!(token = old.token.get(), date = %old.date_key, "releasing overlay");
            effects.push(OverlayEffect::Release(old.token));
        }

        let resolved = match date_key.filter(|d| !d.is_empty()) {
            None => {
                info!("no overlay date selected, overlay removed");
                None
            }
            Some(key) => match self.catalog.resolve(key) {
                Some(range) => Some((key, *range)),
                None => {
                    warn!(date = key, "selected date has no configured time range");
                    None
                }
            },
        };

        match resolved {
            None => {
                if matches!(previous, OverlayState::Loading | OverlayState::Errored) {
                    effects.push(OverlayEffect::HideLoader);
                }
                self.state = OverlayState::Idle;
            }
            Some((key, time_range)) => {
                let request = OverlayRequest {
                    token: self.tokens.next_token(),
                    date_key: key.to_string(),
                    time_range,
                };
                info!(
                    token = request.token.get(),
                    date = key,
                    time = %time_range,
                    "requesting overlay"
                );
                effects.push(OverlayEffect::FitBounds(self.coverage));
                effects.push(OverlayEffect::ShowLoader);
                effects.push(OverlayEffect::Request(request.clone()));
                self.active = Some(request);
                self.state = OverlayState::Loading;
            }
        }

        effects
    }

    /// The tile service finished loading the visible tiles of `token`.
    pub fn tiles_loaded(&mut self, token: OverlayToken) -> Vec<OverlayEffect> {
        let Some(active) = self.current(token) else {
            return Vec::new();
        };
        if self.state != OverlayState::Loading {
            return Vec::new();
        }
        info!(token = token.get(), date = %active.date_key, "overlay loaded");
        self.state = OverlayState::Displayed;
        vec![OverlayEffect::HideLoader]
    }

    /// A tile of `token` failed to load. No retry is attempted.
    pub fn tile_error(&mut self, token: OverlayToken) -> Vec<OverlayEffect> {
        let Some(active) = self.current(token) else {
            return Vec::new();
        };
        warn!(token = token.get(), date = %active.date_key, "error loading overlay tiles");
        if self.state != OverlayState::Loading {
            return Vec::new();
        }
        self.state = OverlayState::Errored;
        vec![OverlayEffect::HideLoader]
    }

    fn current(&self, token: OverlayToken) -> Option<&OverlayRequest> {
        match &self.active {
            Some(active) if active.token == token => Some(active),
            _ => {
                debug!(token = token.get(), "ignoring signal from released overlay");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OverlayEffect, OverlaySelector, OverlayState};
    use crate::catalog::DateCatalog;
    use crate::source::WmsSource;
    use foundation::LonLatBounds;
    use pretty_assertions::assert_eq;

    fn coverage() -> LonLatBounds {
        LonLatBounds::from_sw_ne([21.571121, 87.824427], [21.930816, 88.44833])
    }

    fn selector() -> OverlaySelector {
        OverlaySelector::new(DateCatalog::default(), coverage())
    }

    fn releases(effects: &[OverlayEffect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, OverlayEffect::Release(_)))
            .count()
    }

    fn requests(effects: &[OverlayEffect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, OverlayEffect::Request(_)))
            .count()
    }

    #[test]
    fn known_date_starts_loading() {
        let mut sel = selector();
        let effects = sel.select_date(Some("2020-03-01"));

        assert_eq!(sel.state(), OverlayState::Loading);
        let active = sel.active().expect("active overlay").clone();
        assert_eq!(active.time_range.to_string(), "2020-03-01/2020-03-31");
        assert_eq!(
            effects,
            vec![
                OverlayEffect::FitBounds(coverage()),
                OverlayEffect::ShowLoader,
                OverlayEffect::Request(active),
            ]
        );
    }

    #[test]
    fn unknown_date_stays_idle() {
        let mut sel = selector();
        let effects = sel.select_date(Some("1999-01-01"));
        assert_eq!(sel.state(), OverlayState::Idle);
        assert!(sel.active().is_none());
        assert!(effects.is_empty());
    }

    #[test]
    fn switching_dates_releases_before_requesting() {
        let mut sel = selector();
        sel.select_date(Some("2020-03-01"));
        let first = sel.active().expect("first").token;
        let effects = sel.select_date(Some("2025-03-01"));

        assert_eq!(releases(&effects), 1);
        assert_eq!(requests(&effects), 1);
        assert_eq!(effects[0], OverlayEffect::Release(first));
        assert!(matches!(effects.last(), Some(OverlayEffect::Request(r)) if r.date_key == "2025-03-01"));
        assert_eq!(sel.state(), OverlayState::Loading);
    }

    #[test]
    fn reselecting_same_date_issues_fresh_request() {
        let mut sel = selector();
        sel.select_date(Some("2020-03-01"));
        let first = sel.active().expect("first").token;
        sel.tiles_loaded(first);
        assert_eq!(sel.state(), OverlayState::Displayed);

        let effects = sel.select_date(Some("2020-03-01"));
        let second = sel.active().expect("second").token;
        assert_ne!(first, second);
        assert_eq!(releases(&effects), 1);
        assert_eq!(requests(&effects), 1);
        assert_eq!(sel.state(), OverlayState::Loading);
    }

    #[test]
    fn clearing_from_every_state_returns_to_idle() {
        for (setup, expect_hide) in [
            (None, false),
            (Some("load"), false),
            (Some("error"), true),
            (Some("pending"), true),
        ] {
            let mut sel = selector();
            if let Some(step) = setup {
                sel.select_date(Some("2025-03-01"));
                let token = sel.active().expect("active").token;
                match step {
                    "load" => {
                        sel.tiles_loaded(token);
                    }
                    "error" => {
                        sel.tile_error(token);
                    }
                    _ => {}
                }
            }

            for cleared in [None, Some(""), Some("1999-01-01")] {
                let mut sel = clone_state(&sel);
                let effects = sel.select_date(cleared);
                assert_eq!(sel.state(), OverlayState::Idle);
                assert!(sel.active().is_none());
                assert_eq!(
                    effects.contains(&OverlayEffect::HideLoader),
                    expect_hide,
                    "setup {setup:?} cleared with {cleared:?}"
                );
                assert_eq!(releases(&effects), usize::from(setup.is_some()));
            }
        }
    }

    // Replays the selector into the same state so each clear variant starts fresh.
    fn clone_state(src: &OverlaySelector) -> OverlaySelector {
        let mut sel = selector();
        if let Some(active) = src.active() {
            sel.select_date(Some(&active.date_key));
            let token = sel.active().expect("active").token;
            match src.state() {
                OverlayState::Displayed => {
                    sel.tiles_loaded(token);
                }
                OverlayState::Errored => {
                    sel.tile_error(token);
                }
                _ => {}
            }
        }
        sel
    }

    #[test]
    fn load_and_error_hide_loader_once() {
        let mut sel = selector();
        sel.select_date(Some("2020-03-01"));
        let token = sel.active().expect("active").token;

        assert_eq!(sel.tile_error(token), vec![OverlayEffect::HideLoader]);
        assert_eq!(sel.state(), OverlayState::Errored);
        assert!(sel.tile_error(token).is_empty());
        assert!(sel.tiles_loaded(token).is_empty());
        assert_eq!(sel.state(), OverlayState::Errored);
    }

    #[test]
    fn signals_after_display_change_nothing() {
        let mut sel = selector();
        sel.select_date(Some("2020-03-01"));
        let token = sel.active().expect("active").token;
        assert_eq!(sel.tiles_loaded(token), vec![OverlayEffect::HideLoader]);

        assert!(sel.tile_error(token).is_empty());
        assert!(sel.tiles_loaded(token).is_empty());
        assert_eq!(sel.state(), OverlayState::Displayed);
        assert_eq!(sel.active().map(|a| a.token), Some(token));
    }

    #[test]
    fn stale_signals_are_ignored() {
        let mut sel = selector();
        sel.select_date(Some("2020-03-01"));
        let stale = sel.active().expect("first").token;
        sel.select_date(Some("2025-03-01"));

        assert!(sel.tiles_loaded(stale).is_empty());
        assert!(sel.tile_error(stale).is_empty());
        assert_eq!(sel.state(), OverlayState::Loading);

        sel.select_date(None);
        assert!(sel.tiles_loaded(stale).is_empty());
        assert_eq!(sel.state(), OverlayState::Idle);
    }

    #[test]
    fn tile_params_carry_time_range() {
        let mut sel = selector();
        sel.select_date(Some("2025-03-01"));
        let params = sel
            .active()
            .expect("active")
            .tile_params(&WmsSource::default());
        let get = |k: &str| {
            params
                .iter()
                .find(|(name, _)| *name == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("time"), Some("2025-03-01/2025-03-31"));
        assert_eq!(get("layers"), Some("2_FALSE_COLOR"));
        assert_eq!(get("width"), Some("512"));
        assert_eq!(get("transparent"), Some("true"));
    }
}
