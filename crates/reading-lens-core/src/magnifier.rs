//! Text magnifier: enlarge the word or character cluster under the pointer.
//!
//! The engine is a two-state machine, `Idle` or `Highlighted(run)`. Each frame
//! it hit-tests the latest pointer position and either keeps, replaces or
//! clears the single active wrapper. All DOM work goes through [`TextSurface`].

use serde::Serialize;
use smol_str::SmolStr;

use crate::config::{
    ConfigSchema, Limits, RawConfig, apply, read_bool, read_integer, read_number, read_variant,
};
use crate::exclusion::classify_exclusion;
use crate::platform::TextSurface;
use crate::text::{RangeMode, RangeModeKind, find_range, slice_utf16};
use crate::types::{Caret, Point, TextRange};

/// Class on the wrapper span.
pub const WORD_CLASS: &str = "text-magnifier-word";
/// Class added one layout pass after insertion to start the transition.
pub const MAGNIFIED_CLASS: &str = "magnified";

pub const CLUSTER_SIZE_LIMITS: Limits = Limits::new(1.0, 10.0);
pub const SCALE_LIMITS: Limits = Limits::new(1.1, 2.5);

/// User settings for the magnifier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MagnifierConfig {
    #[serde(rename = "magnifierEnabled")]
    pub enabled: bool,
    #[serde(rename = "magnifierMode")]
    pub mode: RangeModeKind,
    #[serde(rename = "magnifierClusterSize")]
    pub cluster_size: u32,
    #[serde(rename = "magnifierScale")]
    pub scale: f64,
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: RangeModeKind::Word,
            cluster_size: 3,
            scale: 1.35,
        }
    }
}

impl MagnifierConfig {
    pub fn range_mode(&self) -> RangeMode {
        match self.mode {
            RangeModeKind::Word => RangeMode::Word,
            RangeModeKind::Cluster => RangeMode::Cluster {
                count: self.cluster_size as usize,
            },
        }
    }
}

impl ConfigSchema for MagnifierConfig {
    const KEYS: &'static [&'static str] = &[
        "magnifierEnabled",
        "magnifierMode",
        "magnifierClusterSize",
        "magnifierScale",
    ];

    fn merge(&self, raw: &RawConfig) -> Self {
        let mut next = self.clone();
        apply(&mut next.enabled, read_bool(raw, "magnifierEnabled"));
        apply(&mut next.mode, read_variant(raw, "magnifierMode"));
        apply(
            &mut next.cluster_size,
            read_integer(raw, "magnifierClusterSize", CLUSTER_SIZE_LIMITS),
        );
        apply(&mut next.scale, read_number(raw, "magnifierScale", SCALE_LIMITS));
        next
    }
}

/// Why a hover ended with nothing highlighted.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum IdleReason {
    Disabled,
    NoCaret,
    Excluded,
    NoWord,
    HostFailure,
}

/// What a hover did.
#[derive(Clone, Debug, PartialEq)]
pub enum HoverOutcome {
    /// A new run was wrapped.
    Highlighted(SmolStr),
    /// The same text is already highlighted; nothing was touched.
    Unchanged,
    /// Nothing is highlighted now.
    Idle(IdleReason),
}

/// A hit test that found nothing new to highlight.
enum Miss {
    /// The caret is inside a highlight wrapper.
    OnHighlight,
    Idle(IdleReason),
}

impl Miss {
    fn reason(self) -> IdleReason {
        match self {
            Miss::OnHighlight => IdleReason::Excluded,
            Miss::Idle(reason) => reason,
        }
    }
}

struct ActiveHighlight<M> {
    marker: M,
    text: SmolStr,
}

/// Magnifier state for one document attachment.
pub struct Magnifier<M> {
    config: MagnifierConfig,
    active: Option<ActiveHighlight<M>>,
}

impl<M> Magnifier<M> {
    pub fn new(config: MagnifierConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn config(&self) -> &MagnifierConfig {
        &self.config
    }

    pub fn is_highlighted(&self) -> bool {
        self.active.is_some()
    }

    /// Text of the active highlight, if any.
    pub fn highlighted_text(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.text.as_str())
    }

    /// Hit-test `point` and update the highlight.
    pub fn hover<S>(&mut self, surface: &mut S, point: Point) -> HoverOutcome
    where
        S: TextSurface<Marker = M>,
    {
        if !self.config.enabled {
            self.clear(surface);
            return HoverOutcome::Idle(IdleReason::Disabled);
        }

        let (mut caret, mut range, mut matched) = match self.resolve(surface, point) {
            Ok(hit) => hit,
            // The enlarged run sits under the pointer; keep it rather than toggling.
            Err(Miss::OnHighlight) if self.active.is_some() => return HoverOutcome::Unchanged,
            Err(miss) => return self.go_idle(surface, miss.reason()),
        };

        // Compared by content, not position: an identical token elsewhere counts as unchanged.
        if self.highlighted_text() == Some(matched.as_str()) {
            return HoverOutcome::Unchanged;
        }

        if self.active.is_some() {
            self.clear(surface);
            // Unwrapping merges text nodes back together, so the hit is stale.
            match self.resolve(surface, point) {
                Ok(fresh) => (caret, range, matched) = fresh,
                Err(miss) => return HoverOutcome::Idle(miss.reason()),
            }
        }

        match surface.wrap(&caret.node, range) {
            Ok(marker) => {
                tracing::trace!(
                    target: "reading_lens::magnifier",
                    text = %matched,
                    start = range.start,
                    end = range.end,
                    "highlighted run"
                );
                self.active = Some(ActiveHighlight {
                    marker,
                    text: matched.clone(),
                });
                HoverOutcome::Highlighted(matched)
            }
            Err(e) => {
                tracing::warn!(target: "reading_lens::magnifier", "wrap failed: {}", e);
                HoverOutcome::Idle(IdleReason::HostFailure)
            }
        }
    }

    /// Remove the active highlight, restoring the original text. Idempotent.
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: TextSurface<Marker = M>,
    {
        if let Some(active) = self.active.take() {
            if let Err(e) = surface.unwrap(active.marker) {
                tracing::warn!(target: "reading_lens::magnifier", "unwrap failed: {}", e);
            }
        }
    }

    /// Replace the configuration snapshot and react to what changed.
    pub fn reconfigure<S>(&mut self, surface: &mut S, next: MagnifierConfig)
    where
        S: TextSurface<Marker = M>,
    {
        let previous = std::mem::replace(&mut self.config, next);

        if previous.scale != self.config.scale {
            surface.set_scale(self.config.scale);
        }

        let range_changed = previous.mode != self.config.mode
            || previous.cluster_size != self.config.cluster_size;
        if !self.config.enabled || range_changed {
            tracing::debug!(
                target: "reading_lens::magnifier",
                enabled = self.config.enabled,
                mode = self.config.mode.as_str(),
                "configuration change clears highlight"
            );
            self.clear(surface);
        }
    }

    /// Hit-test `point` down to a highlightable run.
    fn resolve<S>(
        &self,
        surface: &S,
        point: Point,
    ) -> Result<(Caret<S::Node>, TextRange, SmolStr), Miss>
    where
        S: TextSurface<Marker = M>,
    {
        let caret = surface
            .caret_from_point(point)
            .ok_or(Miss::Idle(IdleReason::NoCaret))?;

        let owner = surface.owner_info(&caret.node);
        if owner.as_ref().is_some_and(|o| o.inside_highlight) {
            return Err(Miss::OnHighlight);
        }
        if classify_exclusion(owner.as_ref()) {
            tracing::trace!(
                target: "reading_lens::magnifier",
                tag = owner.as_ref().map(|o| o.tag.as_str()),
                "caret on excluded element"
            );
            return Err(Miss::Idle(IdleReason::Excluded));
        }

        let text = surface
            .text_of(&caret.node)
            .ok_or(Miss::Idle(IdleReason::NoCaret))?;
        let range = find_range(&text, caret.offset, self.config.range_mode())
            .ok_or(Miss::Idle(IdleReason::NoWord))?;
        let matched = SmolStr::new(slice_utf16(&text, range));

        Ok((caret, range, matched))
    }

    fn go_idle<S>(&mut self, surface: &mut S, reason: IdleReason) -> HoverOutcome
    where
        S: TextSurface<Marker = M>,
    {
        self.clear(surface);
        HoverOutcome::Idle(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawConfig {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = MagnifierConfig::from_raw(&RawConfig::new());
        assert_eq!(config, MagnifierConfig::default());
        assert_eq!(config.range_mode(), RangeMode::Word);
    }

    #[test]
    fn test_config_merge_validates_each_field() {
        let config = MagnifierConfig::from_raw(&raw(json!({
            "magnifierEnabled": "yes",
            "magnifierMode": "cluster",
            "magnifierClusterSize": 40,
            "magnifierScale": 0.5,
            "unrelated": true,
        })));
        assert!(config.enabled);
        assert_eq!(config.mode, RangeModeKind::Cluster);
        assert_eq!(config.cluster_size, 10);
        assert_eq!(config.scale, 1.1);
        assert_eq!(config.range_mode(), RangeMode::Cluster { count: 10 });
    }

    #[test]
    fn test_config_serializes_stored_keys() {
        let config = MagnifierConfig {
            mode: RangeModeKind::Cluster,
            cluster_size: 4,
            ..Default::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({
                "magnifierEnabled": true,
                "magnifierMode": "cluster",
                "magnifierClusterSize": 4,
                "magnifierScale": 1.35,
            })
        );
        assert_eq!(MagnifierConfig::from_raw(value.as_object().unwrap()), config);
    }

    #[test]
    fn test_config_unknown_mode_keeps_previous() {
        let base = MagnifierConfig {
            mode: RangeModeKind::Cluster,
            ..Default::default()
        };
        let next = base.merge(&raw(json!({ "magnifierMode": "sentence" })));
        assert_eq!(next.mode, RangeModeKind::Cluster);
    }
}
