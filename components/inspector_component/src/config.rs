//! Configuration for the inspector

use frame_decoder::Hypothesis;
use search_index::DEFAULT_GRAM_LENGTH;
use serde::{Deserialize, Serialize};

/// Configuration for an [`Inspector`](crate::Inspector)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectorConfig {
    /// Capacity of the transport event channel
    event_channel_capacity: usize,

    /// Capacity of the change notification channel
    change_channel_capacity: usize,

    /// Longest substring stored by each connection's search index
    gram_length: usize,

    /// Hypothesis the decoder tries first
    initial_hypothesis: Hypothesis,
}

impl InspectorConfig {
    /// Create a new builder for InspectorConfig
    ///
    /// # Example
    ///
    /// ```
    /// use inspector_component::InspectorConfig;
    ///
    /// let config = InspectorConfig::builder()
    ///     .event_channel_capacity(64)
    ///     .build();
    /// assert_eq!(config.event_channel_capacity(), 64);
    /// ```
    pub fn builder() -> InspectorConfigBuilder {
        InspectorConfigBuilder::default()
    }

    pub fn event_channel_capacity(&self) -> usize {
        self.event_channel_capacity
    }

    pub fn change_channel_capacity(&self) -> usize {
        self.change_channel_capacity
    }

    pub fn gram_length(&self) -> usize {
        self.gram_length
    }

    pub fn initial_hypothesis(&self) -> Hypothesis {
        self.initial_hypothesis
    }
}

impl Default for InspectorConfig {
    /// Default values:
    /// - event_channel_capacity: 1024
    /// - change_channel_capacity: 256
    /// - gram_length: 3
    /// - initial_hypothesis: utf8/delimited
    fn default() -> Self {
        Self {
            event_channel_capacity: 1024,
            change_channel_capacity: 256,
            gram_length: DEFAULT_GRAM_LENGTH,
            initial_hypothesis: Hypothesis::default(),
        }
    }
}

/// Builder for InspectorConfig
#[derive(Debug, Clone, Default)]
pub struct InspectorConfigBuilder {
    event_channel_capacity: Option<usize>,
    change_channel_capacity: Option<usize>,
    gram_length: Option<usize>,
    initial_hypothesis: Option<Hypothesis>,
}

impl InspectorConfigBuilder {
    /// Set the transport event channel capacity
    pub fn event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = Some(capacity);
        self
    }

    /// Set the change notification channel capacity
    pub fn change_channel_capacity(mut self, capacity: usize) -> Self {
        self.change_channel_capacity = Some(capacity);
        self
    }

    /// Set the longest indexed substring
    pub fn gram_length(mut self, length: usize) -> Self {
        self.gram_length = Some(length);
        self
    }

    /// Set the hypothesis the decoder starts from
    pub fn initial_hypothesis(mut self, hypothesis: Hypothesis) -> Self {
        self.initial_hypothesis = Some(hypothesis);
        self
    }

    /// Build the InspectorConfig
    ///
    /// Uses default values for any options not explicitly set.
    pub fn build(self) -> InspectorConfig {
        let default = InspectorConfig::default();

        InspectorConfig {
            event_channel_capacity: self
                .event_channel_capacity
                .unwrap_or(default.event_channel_capacity),
            change_channel_capacity: self
                .change_channel_capacity
                .unwrap_or(default.change_channel_capacity),
            gram_length: self.gram_length.unwrap_or(default.gram_length),
            initial_hypothesis: self.initial_hypothesis.unwrap_or(default.initial_hypothesis),
        }
    }
}
