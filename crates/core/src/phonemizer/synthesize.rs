//! Syllable → alias synthesis for CVVC voicebanks.
//!
//! Each syllable is classified by shape once, then every slot is filled by
//! trying an ordered list of candidate aliases against the voicebank. A
//! rejected candidate falls through to the next; the least specific unit of
//! a slot (the nucleus, the transition out of the previous vowel) is
//! emitted even when the voicebank lacks it.

use crate::language::phonology::is_hard;
use crate::types::{Ending, Syllable};
use crate::voicebank::AliasInventory;

/// Syllable shapes, by previous vowel and cluster size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyllableShape {
    StartingV,
    Vv,
    StartingCv1,
    StartingCvn,
    Vcv1,
    Vcvn,
}

impl SyllableShape {
    pub fn of(syllable: &Syllable) -> Self {
        match (syllable.is_starting(), syllable.cc.len()) {
            (true, 0) => Self::StartingV,
            (false, 0) => Self::Vv,
            (true, 1) => Self::StartingCv1,
            (true, _) => Self::StartingCvn,
            (false, 1) => Self::Vcv1,
            (false, _) => Self::Vcvn,
        }
    }
}

/// Ending shapes, by trailing cluster size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndingShape {
    EndingV,
    EndingVc1,
    EndingVcn,
}

impl EndingShape {
    pub fn of(ending: &Ending) -> Self {
        match ending.cc.len() {
            0 => Self::EndingV,
            1 => Self::EndingVc1,
            _ => Self::EndingVcn,
        }
    }
}

/// Turns syllables and endings into alias lists for one voicebank.
pub struct AliasSynthesizer<'a> {
    inventory: &'a dyn AliasInventory,
}

impl<'a> AliasSynthesizer<'a> {
    pub fn new(inventory: &'a dyn AliasInventory) -> Self {
        Self { inventory }
    }

    fn has(&self, alias: &str, tone: i32) -> bool {
        self.inventory.has_alias(alias, tone)
    }

    /// Index of the first candidate the voicebank has.
    fn first_available(&self, candidates: &[String], tone: i32) -> Option<usize> {
        candidates.iter().position(|c| self.has(c, tone))
    }

    fn try_push(&self, out: &mut Vec<String>, alias: String, tone: i32) {
        if self.has(&alias, tone) {
            out.push(alias);
        }
    }

    /// Aliases for one syllable, in playback order.
    ///
    /// Empty only for a vowel-to-vowel syllable that extends the previous alias.
    pub fn synthesize(&self, syllable: &Syllable) -> Vec<String> {
        let Syllable {
            prev_v, cc, v, tone, ..
        } = syllable;
        let tone = *tone;
        let mut out = Vec::new();

        match SyllableShape::of(syllable) {
            SyllableShape::StartingV => out.push(format!("- {v}")),
            SyllableShape::Vv => {
                let can_extend = syllable.can_alias_be_extended && prev_v == v;
                if !can_extend || !self.inventory.same_subbank(tone, syllable.vowel_tone) {
                    out.push(format!("{prev_v} {v}"));
                }
            }
            SyllableShape::StartingCv1 => {
                let c = &cc[0];
                let cv = format!("- {c}{v}");
                if self.has(&cv, tone) {
                    out.push(cv);
                } else {
                    self.try_push(&mut out, format!("- {c}"), tone);
                    out.push(format!("{c}{v}"));
                }
            }
            SyllableShape::StartingCvn => {
                if !is_hard(&cc[0]) {
                    out.push(format!("- {}", cc[0]));
                }
                let nucleus = self.cluster(&mut out, cc, v, tone, true);
                out.push(nucleus);
            }
            SyllableShape::Vcv1 => {
                let c = &cc[0];
                out.push(format!("{prev_v} {c}"));
                out.push(format!("{c}{v}"));
            }
            SyllableShape::Vcvn => {
                out.push(format!("{prev_v} {}", cc[0]));
                let nucleus = self.cluster(&mut out, cc, v, tone, false);
                out.push(nucleus);
            }
        }
        out
    }

    /// Split a cluster of two or more consonants into pair units, returning
    /// the nucleus alias.
    ///
    /// A `CCV` alias for the last two consonants is preferred; without one,
    /// every adjacent pair is tried as `CC_` and the nucleus is a plain `CV`.
    /// Bare `CC` pair units are only used after a vowel.
    fn cluster(
        &self,
        out: &mut Vec<String>,
        cc: &[String],
        v: &str,
        tone: i32,
        starting: bool,
    ) -> String {
        let n = cc.len();
        let last = &cc[n - 1];
        let mut nucleus = format!("{last}{v}");

        let ccv = format!("{}{last}{v}", cc[n - 2]);
        if self.has(&ccv, tone) {
            nucleus = ccv;
            for i in 0..n - 2 {
                let (a, b) = (&cc[i], &cc[i + 1]);
                let first = if starting && i == 0 {
                    format!("- {a}{b}_")
                } else {
                    format!("{a} {b}")
                };
                let candidates = [first, format!("{a}{b}_")];
                let chosen = self.first_available(&candidates, tone);
                if chosen != Some(0) && i + 1 == n - 2 {
                    let joined = format!("_{nucleus}");
                    if self.has(&joined, tone) {
                        nucleus = joined;
                    }
                }
                if let Some(k) = chosen {
                    out.push(candidates[k].clone());
                }
            }
        } else {
            for i in 0..n - 1 {
                let (a, b) = (&cc[i], &cc[i + 1]);
                let mut candidates = Vec::with_capacity(4);
                if starting && i == 0 {
                    candidates.push(format!("- {a}{b}_"));
                }
                candidates.push(format!("{a}{b}_"));
                let joined_forms = candidates.len();
                candidates.push(format!("{a} {b}"));
                if !starting {
                    candidates.push(format!("{a}{b}"));
                }

                match self.first_available(&candidates, tone) {
                    Some(k) if k < joined_forms => {
                        out.push(candidates[k].clone());
                        let joined = format!("_{last}{v}");
                        if i + 1 == n - 1 && self.has(&joined, tone) {
                            nucleus = joined;
                        }
                    }
                    Some(k) => out.push(candidates[k].clone()),
                    None => {}
                }
            }
        }
        nucleus
    }

    /// Aliases closing a word, in playback order.
    pub fn synthesize_ending(&self, ending: &Ending) -> Vec<String> {
        let Ending { prev_v: v, cc, tone } = ending;
        let tone = *tone;
        let mut out = Vec::new();

        match EndingShape::of(ending) {
            EndingShape::EndingV => out.push(format!("{v} -")),
            EndingShape::EndingVc1 => {
                let c = &cc[0];
                let vc = format!("{v}{c} -");
                if self.has(&vc, tone) {
                    out.push(vc);
                } else {
                    out.push(format!("{v} {c}"));
                    out.push(format!("{c} -'"));
                }
            }
            EndingShape::EndingVcn => {
                let n = cc.len();
                out.push(format!("{v} {}", cc[0]));
                let mut has_ending = false;
                for i in 0..n - 1 {
                    let (a, b) = (&cc[i], &cc[i + 1]);
                    let is_final = i == n - 2;
                    let first = if is_final {
                        format!("{a}{b} -")
                    } else {
                        format!("{a} {b}")
                    };
                    let candidates = [first, format!("{a}{b}_")];
                    let chosen = self.first_available(&candidates, tone);
                    if let Some(k) = chosen {
                        out.push(candidates[k].clone());
                    }
                    has_ending = is_final && chosen == Some(0);
                }
                if !has_ending {
                    self.try_push(&mut out, format!("{} -", cc[n - 1]), tone);
                }
            }
        }
        out
    }
}
