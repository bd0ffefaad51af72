//! Hand-off encoding
//!
//! This module packages a relabeled session into the JSON payload read by the
//! external epoching stage: the event array, the restricted label map, the
//! epoching parameters and provenance.

use crate::config::EpochingConfig;
use crate::convention::Convention;
use crate::error::RelabelError;
use crate::filter::restrict;
use crate::relabeler::Relabeling;
use crate::taxonomy::LabelTaxonomy;
use crate::types::{HandoffPayload, HandoffProducer, HandoffProvenance};
use crate::{PRODUCER_NAME, VERSION};
use chrono::Utc;
use uuid::Uuid;

/// Current hand-off payload format version
pub const FORMAT_VERSION: &str = "1.0.0";

/// Encoder for hand-off payloads
pub struct HandoffEncoder {
    instance_id: String,
}

impl Default for HandoffEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HandoffEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Build the payload for one relabeled session.
    ///
    /// `event_id` is `taxonomy` restricted to the codes of labeled events.
    /// Passed-through raw codes never enter it, even when they collide with a
    /// taxonomy code.
    pub fn encode(
        &self,
        session_id: &str,
        convention: Convention,
        taxonomy: &LabelTaxonomy,
        relabeling: &Relabeling,
        epoching: &EpochingConfig,
    ) -> Result<HandoffPayload, RelabelError> {
        epoching.validate()?;

        let events = relabeling.trigger_events();
        let labeled = relabeling
            .events
            .iter()
            .filter(|e| e.label.is_some())
            .map(|e| e.event.code);
        let event_id = restrict(taxonomy, labeled);

        let producer = HandoffProducer {
            name: PRODUCER_NAME.to_string(),
            version: VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let provenance = HandoffProvenance {
            session_id: session_id.to_string(),
            convention,
            computed_at_utc: Utc::now().to_rfc3339(),
        };

        Ok(HandoffPayload {
            format_version: FORMAT_VERSION.to_string(),
            producer,
            provenance,
            event_id,
            events,
            epoching: epoching.clone(),
            summary: relabeling.summary.clone(),
        })
    }

    /// Serialize a payload, pretty-printed or compact
    pub fn to_json(payload: &HandoffPayload, pretty: bool) -> Result<String, RelabelError> {
        let json = if pretty {
            serde_json::to_string_pretty(payload)?
        } else {
            serde_json::to_string(payload)?
        };
        Ok(json)
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        session_id: &str,
        convention: Convention,
        taxonomy: &LabelTaxonomy,
        relabeling: &Relabeling,
        epoching: &EpochingConfig,
    ) -> Result<String, RelabelError> {
        let payload = self.encode(session_id, convention, taxonomy, relabeling, epoching)?;
        Self::to_json(&payload, true)
    }
}
