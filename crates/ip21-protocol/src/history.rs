//! History envelope encoding for the ProcessData REST `History` endpoint.
//!
//! A history request is a `<Q>` document carrying one `<Tag>` element per
//! requested tag. Each `<Tag>` names the point, the IP21 data source, the
//! field to read (always `VAL`), the time window in epoch milliseconds, and
//! the retrieval options. The service accepts any number of `<Tag>` elements
//! in one request, so multi-tag reads batch into a single round trip.

use crate::error::ProtocolError;
use crate::xml::{write_cdata_element, write_text_element};

/// Shape of the values returned for each history sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFormat {
    /// Values in their native numeric representation.
    #[default]
    Raw,
    /// Values rendered by the server as record strings.
    RecordAsString,
}

impl HistoryFormat {
    /// Wire code for this format.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Raw => 0,
            Self::RecordAsString => 1,
        }
    }
}

impl TryFrom<u8> for HistoryFormat {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, ProtocolError> {
        match code {
            0 => Ok(Self::Raw),
            1 => Ok(Self::RecordAsString),
            other => Err(ProtocolError::UnknownHistoryFormat(other)),
        }
    }
}

/// Vendor-defined retrieval type codes for history reads.
///
/// These select how the server walks or aggregates the archive between the
/// requested start and end times. The codes are fixed by the ProcessData
/// interface; [`RetrievalType::Actual`] returns stored samples as-is and is
/// the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum RetrievalType {
    /// Stored samples exactly as archived.
    #[default]
    Actual,
    /// Values interpolated onto a regular interval.
    Interpolated,
    /// Reduced sample set chosen for plotting fidelity.
    BestFit,
    /// Manually entered values only.
    Manual,
    /// Time-weighted average per interval.
    Average,
    /// Minimum value per interval.
    Minimum,
    /// Maximum value per interval.
    Maximum,
    /// Max minus min per interval.
    Range,
    /// Sum of values per interval.
    Sum,
    /// Standard deviation per interval.
    StandardDeviation,
    /// Variance per interval.
    Variance,
    /// Count of good-quality samples per interval.
    Good,
    /// Count of bad-quality samples per interval.
    Bad,
    /// Count of suspect-quality samples per interval.
    Suspect,
    /// Percentage of interval covered by good samples.
    PercentGood,
    /// Percentage of interval covered by bad samples.
    PercentBad,
    /// Percentage of interval covered by suspect samples.
    PercentSuspect,
    /// Time-weighted total per interval.
    Total,
    /// Count of all samples per interval.
    Count,
    /// Rate of change per interval.
    RateOfChange,
    /// First sample in each interval.
    First,
    /// Difference between first and last sample per interval.
    Delta,
    /// Last sample in each interval.
    Last,
}

impl RetrievalType {
    /// Wire code for this retrieval type.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Actual => 0,
            Self::Interpolated => 1,
            Self::BestFit => 2,
            Self::Manual => 3,
            Self::Average => 4,
            Self::Minimum => 5,
            Self::Maximum => 6,
            Self::Range => 7,
            Self::Sum => 8,
            Self::StandardDeviation => 9,
            Self::Variance => 10,
            Self::Good => 11,
            Self::Bad => 12,
            Self::Suspect => 13,
            Self::PercentGood => 14,
            Self::PercentBad => 15,
            Self::PercentSuspect => 16,
            Self::Total => 17,
            Self::Count => 18,
            Self::RateOfChange => 19,
            Self::First => 20,
            Self::Delta => 21,
            Self::Last => 22,
        }
    }
}

impl TryFrom<u8> for RetrievalType {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, ProtocolError> {
        Ok(match code {
            0 => Self::Actual,
            1 => Self::Interpolated,
            2 => Self::BestFit,
            3 => Self::Manual,
            4 => Self::Average,
            5 => Self::Minimum,
            6 => Self::Maximum,
            7 => Self::Range,
            8 => Self::Sum,
            9 => Self::StandardDeviation,
            10 => Self::Variance,
            11 => Self::Good,
            12 => Self::Bad,
            13 => Self::Suspect,
            14 => Self::PercentGood,
            15 => Self::PercentBad,
            16 => Self::PercentSuspect,
            17 => Self::Total,
            18 => Self::Count,
            19 => Self::RateOfChange,
            20 => Self::First,
            21 => Self::Delta,
            22 => Self::Last,
            other => return Err(ProtocolError::UnknownRetrievalType(other)),
        })
    }
}

/// Options applied to every tag in a history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Maximum number of samples returned per tag (default: 100 000).
    pub limit: u32,
    /// Whether to include the samples just outside the window (default: false).
    pub outsiders: bool,
    /// Value rendering format (default: [`HistoryFormat::Raw`]).
    pub history_format: HistoryFormat,
    /// Archive walk / aggregation mode (default: [`RetrievalType::Actual`]).
    pub retrieval_type: RetrievalType,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            limit: 100_000,
            outsiders: false,
            history_format: HistoryFormat::Raw,
            retrieval_type: RetrievalType::Actual,
        }
    }
}

impl HistoryOptions {
    /// Create options with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-tag sample limit.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Include the samples immediately outside the requested window.
    #[must_use]
    pub fn outsiders(mut self, outsiders: bool) -> Self {
        self.outsiders = outsiders;
        self
    }

    /// Set the value rendering format.
    #[must_use]
    pub fn history_format(mut self, format: HistoryFormat) -> Self {
        self.history_format = format;
        self
    }

    /// Set the retrieval type.
    #[must_use]
    pub fn retrieval_type(mut self, retrieval: RetrievalType) -> Self {
        self.retrieval_type = retrieval;
        self
    }
}

/// One or more tag names addressed by a history request.
///
/// Accepts a single tag or a batch; conversions exist for the common caller
/// shapes so `history("TAG1", ..)` and `history(vec![a, b], ..)` both read
/// naturally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSelection(Vec<String>);

impl TagSelection {
    /// The selected tag names, in request order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.0
    }

    /// Number of tags selected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no tags are selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TagSelection {
    fn from(tag: &str) -> Self {
        Self(vec![tag.to_string()])
    }
}

impl From<String> for TagSelection {
    fn from(tag: String) -> Self {
        Self(vec![tag])
    }
}

impl From<Vec<String>> for TagSelection {
    fn from(tags: Vec<String>) -> Self {
        Self(tags)
    }
}

impl From<&[&str]> for TagSelection {
    fn from(tags: &[&str]) -> Self {
        Self(tags.iter().map(|t| (*t).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TagSelection {
    fn from(tags: [&str; N]) -> Self {
        Self(tags.iter().map(|t| (*t).to_string()).collect())
    }
}

/// A history read over a time window for one or more tags.
#[derive(Debug, Clone)]
pub struct HistoryRequest {
    tags: TagSelection,
    start_ms: i64,
    end_ms: i64,
    options: HistoryOptions,
}

impl HistoryRequest {
    /// Create a history request. The window is epoch milliseconds, inclusive.
    pub fn new(
        tags: impl Into<TagSelection>,
        start_ms: i64,
        end_ms: i64,
        options: HistoryOptions,
    ) -> Result<Self, ProtocolError> {
        let tags = tags.into();
        if tags.is_empty() {
            return Err(ProtocolError::EmptyTagSet);
        }
        Ok(Self {
            tags,
            start_ms,
            end_ms,
            options,
        })
    }

    /// The selected tags.
    #[must_use]
    pub fn tags(&self) -> &TagSelection {
        &self.tags
    }

    /// Encode the `<Q>` envelope for the given IP21 data-source host.
    #[must_use]
    pub fn encode(&self, ip21_address: &str) -> String {
        let mut out = String::with_capacity(128 * self.tags.len() + 32);
        out.push_str(r#"<Q f="d" allQuotes="1">"#);
        for tag in self.tags.tags() {
            out.push_str("<Tag>");
            write_cdata_element(&mut out, "N", tag);
            write_cdata_element(&mut out, "D", ip21_address);
            write_cdata_element(&mut out, "F", "VAL");
            write_text_element(&mut out, "HF", &self.options.history_format.code().to_string());
            write_text_element(&mut out, "St", &self.start_ms.to_string());
            write_text_element(&mut out, "Et", &self.end_ms.to_string());
            write_text_element(&mut out, "RT", &self.options.retrieval_type.code().to_string());
            write_text_element(&mut out, "X", &self.options.limit.to_string());
            write_text_element(&mut out, "O", &u8::from(self.options.outsiders).to_string());
            out.push_str("</Tag>");
        }
        out.push_str("</Q>");
        out
    }
}
