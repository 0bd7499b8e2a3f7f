use crate::config::Config;

/// Phred thresholds used by the per-gene quality fractions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityThresholds {
    pub umi_quality: u8,
    pub genomic_quality: u8,
}

impl QualityThresholds {
    pub const PHRED_OFFSET: u8 = 33;

    /// Highest encoded UMI quality character that does not count as high quality.
    pub fn umi_quality_ascii(&self) -> u8 {
        self.umi_quality.saturating_add(Self::PHRED_OFFSET)
    }
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            umi_quality: 30,
            genomic_quality: 30,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricsOptions {
    pub thresholds: QualityThresholds,
    pub min_mapping_quality: u8,
}

impl MetricsOptions {
    pub fn new(umi_quality: u8, genomic_quality: u8) -> Self {
        Self {
            thresholds: QualityThresholds {
                umi_quality,
                genomic_quality,
            },
            min_mapping_quality: 0,
        }
    }

    pub fn with_min_mapping_quality(mut self, min_mapping_quality: Option<u8>) -> Self {
        if let Some(mapq) = min_mapping_quality {
            self.min_mapping_quality = mapq;
        }
        self
    }
}

impl Default for MetricsOptions {
    fn default() -> Self {
        let thresholds = QualityThresholds::default();
        Self::new(thresholds.umi_quality, thresholds.genomic_quality)
    }
}

impl From<&Config> for MetricsOptions {
    fn from(config: &Config) -> Self {
        Self::new(config.umi_quality_threshold, config.genomic_quality_threshold)
            .with_min_mapping_quality(Some(config.min_mapping_quality))
    }
}
