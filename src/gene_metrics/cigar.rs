use crate::error::RecordError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Match,
    Insertion,
    Deletion,
    Skip,
    SoftClip,
    HardClip,
    Pad,
    SequenceMatch,
    SequenceMismatch,
}

impl Kind {
    fn from_char(ch: char) -> Option<Self> {
        let kind = match ch {
            'M' => Kind::Match,
            'I' => Kind::Insertion,
            'D' => Kind::Deletion,
            'N' => Kind::Skip,
            'S' => Kind::SoftClip,
            'H' => Kind::HardClip,
            'P' => Kind::Pad,
            '=' => Kind::SequenceMatch,
            'X' => Kind::SequenceMismatch,
            _ => return None,
        };
        Some(kind)
    }

    fn consumes_query(self) -> bool {
        matches!(
            self,
            Kind::Match
                | Kind::Insertion
                | Kind::SoftClip
                | Kind::SequenceMatch
                | Kind::SequenceMismatch
        )
    }
}

/// A parsed CIGAR. An unavailable CIGAR (`*`) parses to no operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cigar {
    ops: Vec<(Kind, usize)>,
}

impl Cigar {
    /// Parses a SAM CIGAR string, rejecting unknown operators, missing or zero
    /// lengths, and trailing digits.
    pub fn parse(text: &str) -> Result<Self, RecordError> {
        if text.is_empty() || text == "*" {
            return Ok(Self::default());
        }

        let invalid = || RecordError::InvalidCigar(text.to_string());
        let mut ops = Vec::new();
        let mut len: Option<usize> = None;

        for ch in text.chars() {
            if let Some(digit) = ch.to_digit(10) {
                let current = len.unwrap_or(0);
                len = Some(
                    current
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(digit as usize))
                        .ok_or_else(invalid)?,
                );
            } else {
                let kind = Kind::from_char(ch).ok_or_else(invalid)?;
                match len.take() {
                    Some(n) if n > 0 => ops.push((kind, n)),
                    _ => return Err(invalid()),
                }
            }
        }

        if len.is_some() {
            return Err(invalid());
        }

        Ok(Self { ops })
    }

    pub fn ops(&self) -> &[(Kind, usize)] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Whether the alignment spans a skipped (intronic) region.
    pub fn is_spliced(&self) -> bool {
        self.ops.iter().any(|(kind, _)| *kind == Kind::Skip)
    }

    /// Number of read bases described by the CIGAR, soft clips included.
    pub fn query_length(&self) -> usize {
        self.ops
            .iter()
            .filter(|(kind, _)| kind.consumes_query())
            .map(|(_, len)| *len)
            .sum()
    }

    pub fn leading_soft_clip(&self) -> usize {
        soft_clip(self.ops.iter())
    }

    pub fn trailing_soft_clip(&self) -> usize {
        soft_clip(self.ops.iter().rev())
    }
}

// Hard clips may sit outside soft clips; neither is part of the aligned query.
fn soft_clip<'a>(ops: impl Iterator<Item = &'a (Kind, usize)>) -> usize {
    ops.take_while(|(kind, _)| matches!(kind, Kind::SoftClip | Kind::HardClip))
        .filter(|(kind, _)| *kind == Kind::SoftClip)
        .map(|(_, len)| *len)
        .sum()
}
