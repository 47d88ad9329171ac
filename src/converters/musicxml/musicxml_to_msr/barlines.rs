//! Barlines and the repeat state machine
//!
//! MusicXML barlines do not nest repeats explicitly; a repeat is recovered
//! from the sequence of categorized barlines in one voice:
//!
//! ```text
//! RepeatStart      open a segment, start the repeat
//! EndingStart      close the body (if not yet closed), open an ending
//! HookedEndingEnd  close the ending, repeat stays open for more endings
//! HooklessEndingEnd close the ending, finish the repeat
//! RepeatEnd        close the body, finish the repeat
//! ```
//!
//! A finished repeat replaces its drained segments at the index where its
//! body began. An end barline with no repeat start before it gets an
//! implicit start barline at the beginning of the body.

use crate::converters::musicxml::musicxml_to_msr::element::{ElementKind, MusicXmlElement};
use crate::converters::musicxml::musicxml_to_msr::errors::TranslationError;
use crate::converters::musicxml::musicxml_to_msr::session::{
    voice_at, RepeatBuilder, RepeatStartKind, VoiceAddress,
};
use crate::converters::musicxml::musicxml_to_msr::translator::MsrTranslator;
use crate::msr::{
    BarStyle, Barline, BarlineCategory, BarlineLocation, EndingType, MeasureLocation, Rational,
    Repeat, RepeatDirection, RepeatEnding, RepeatEndingKind, RepeatWinged, Voice, VoiceChunk,
    VoiceElement,
};

/// Measure number of the first bar check in `elements`
fn first_measure_number(elements: &[VoiceElement]) -> String {
    elements
        .iter()
        .find_map(|element| match element {
            VoiceElement::BarCheck(check) => Some(check.measure_number.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

impl MsrTranslator {
    // ========================================================================
    // ACCUMULATION
    // ========================================================================

    pub(super) fn handle_barline_start(&mut self, element: &dyn MusicXmlElement) {
        let line = element.input_line();

        let location = match element.attribute("location") {
            None => BarlineLocation::Right,
            Some(text) => BarlineLocation::from_musicxml(text).unwrap_or_else(|| {
                self.musicxml_error(line, format!("barline location \"{}\" is unknown, right assumed", text));
                BarlineLocation::Right
            }),
        };

        self.session.barline = Some(Barline {
            input_line: line,
            location,
            ..Barline::default()
        });
    }

    pub(super) fn handle_barline_child(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        if self.session.barline.is_none() {
            return;
        }
        let line = element.input_line();

        match kind {
            ElementKind::BarStyle => {
                let value = element.value();
                let style = BarStyle::from_musicxml(value);
                if style.is_none() {
                    self.musicxml_error(line, format!("bar-style \"{}\" is unknown", value));
                }
                if let Some(barline) = self.session.barline.as_mut() {
                    barline.style = style;
                }
            }
            ElementKind::Ending => {
                let text = element.attribute("type").unwrap_or("");
                let ending_type = EndingType::from_musicxml(text);
                if ending_type.is_none() {
                    self.musicxml_error(line, format!("ending type \"{}\" is unknown", text));
                }
                if let Some(barline) = self.session.barline.as_mut() {
                    barline.ending_type = ending_type;
                    barline.ending_number = element.attribute("number").unwrap_or("").trim().to_string();
                }
            }
            ElementKind::Repeat => {
                let text = element.attribute("direction").unwrap_or("");
                let direction = RepeatDirection::from_musicxml(text);
                if direction.is_none() {
                    self.musicxml_error(line, format!("repeat direction \"{}\" is unknown", text));
                }

                let winged = match element.attribute("winged") {
                    None => None,
                    Some(text) => {
                        let winged = RepeatWinged::from_musicxml(text);
                        if winged.is_none() {
                            self.musicxml_error(line, format!("repeat winged \"{}\" is unknown", text));
                        }
                        winged
                    }
                };

                if let Some(barline) = self.session.barline.as_mut() {
                    barline.repeat_direction = direction;
                    barline.repeat_winged = winged;
                }
            }
            _ => {}
        }
    }

    pub(super) fn handle_barline_end(&mut self) -> Result<(), TranslationError> {
        let Some(mut barline) = self.session.barline.take() else {
            return Ok(());
        };
        let line = barline.input_line;

        self.finalize_pending_tuplets(line)?;
        self.session.chord_in_progress = false;

        barline.category = barline.classify();
        barline.measure_location = self.current_voice_mut(line)?.location.clone();

        trace_event!(
            self,
            "{:?} barline at line {} in measure {}",
            barline.category,
            line,
            barline.measure_location.measure_number
        );

        match barline.category {
            BarlineCategory::RepeatStart => self.handle_repeat_start(barline),
            BarlineCategory::EndingStart => self.handle_ending_start(barline),
            BarlineCategory::HookedEndingEnd => self.handle_ending_end(barline, RepeatEndingKind::Hooked),
            BarlineCategory::HooklessEndingEnd => {
                self.handle_ending_end(barline, RepeatEndingKind::Hookless)
            }
            BarlineCategory::RepeatEnd => self.handle_repeat_end(barline),
            BarlineCategory::Standalone => {
                self.current_voice_mut(line)?.append(VoiceElement::Barline(barline));
                Ok(())
            }
        }
    }

    // ========================================================================
    // REPEAT STATE MACHINE
    // ========================================================================

    /// Voice repeat barlines go to: the repeat's own voice if one is open
    fn repeat_voice_address(&self, line: usize) -> Result<VoiceAddress, TranslationError> {
        match &self.session.repeat {
            Some(builder) => Ok(builder.voice),
            None => self.current_voice_address(line),
        }
    }

    /// The repeat under construction, created without a start if needed,
    /// together with its voice
    fn repeat_and_voice(
        &mut self,
        line: usize,
    ) -> Result<(&mut RepeatBuilder, &mut Voice), TranslationError> {
        let at = self.repeat_voice_address(line)?;
        let Self { score, session, settings, .. } = self;

        let builder = session
            .repeat
            .get_or_insert_with(|| RepeatBuilder::new(at, None, line));
        let voice = voice_at(score, builder.voice, &session.measure_number, line).ok_or_else(|| {
            TranslationError::internal(
                settings.input_source_name.clone(),
                line,
                format!("part index {} is not registered", at.part.0),
            )
        })?;

        Ok((builder, voice))
    }

    fn pop_pending(&mut self, category: BarlineCategory) -> bool {
        match self.session.pending_barlines.last() {
            Some(barline) if barline.category == category => {
                self.session.pending_barlines.pop();
                true
            }
            _ => false,
        }
    }

    fn handle_repeat_start(&mut self, barline: Barline) -> Result<(), TranslationError> {
        let line = barline.input_line;

        if let Some(previous) = self.session.repeat.take() {
            trace_event!(self, "repeat start at line {} finishes the previous repeat", line);
            self.finish_repeat(previous, line)?;
        }

        let at = self.current_voice_address(line)?;
        let voice = self.voice_mut(at, line)?;
        voice.open_segment();
        voice.append(VoiceElement::Barline(barline.clone()));

        self.session.pending_barlines.push(barline);
        self.session.repeat = Some(RepeatBuilder::new(at, Some(RepeatStartKind::Explicit), line));
        Ok(())
    }

    fn handle_ending_start(&mut self, barline: Barline) -> Result<(), TranslationError> {
        let line = barline.input_line;

        let (builder, voice) = self.repeat_and_voice(line)?;
        if builder.body.is_none() {
            builder.anchor = voice.segment_start();
            builder.body = Some(voice.close_segment(line));
        }
        voice.append(VoiceElement::Barline(barline.clone()));

        self.session.pending_barlines.push(barline);
        Ok(())
    }

    fn handle_ending_end(
        &mut self,
        barline: Barline,
        kind: RepeatEndingKind,
    ) -> Result<(), TranslationError> {
        let line = barline.input_line;
        let number = barline.ending_number.clone();

        if !self.pop_pending(BarlineCategory::EndingStart) {
            self.warning(line, format!("ending \"{}\" ends without having started", number));
        }

        let (builder, voice) = self.repeat_and_voice(line)?;
        voice.append(VoiceElement::Barline(barline));

        let chunk = if builder.body.is_none() {
            builder.anchor = voice.segment_start();
            builder.body = Some(voice.close_segment(line));
            VoiceChunk::new(line)
        } else {
            voice.close_segment(line)
        };

        builder.endings.push(RepeatEnding {
            input_line: line,
            number,
            kind,
            chunk,
        });

        self.ensure_repeat_start(line)?;

        if kind == RepeatEndingKind::Hookless {
            self.finalize_pending_repeat(line)?;
        }
        Ok(())
    }

    fn handle_repeat_end(&mut self, barline: Barline) -> Result<(), TranslationError> {
        let line = barline.input_line;

        let (_, voice) = self.repeat_and_voice(line)?;
        voice.append(VoiceElement::Barline(barline));

        self.ensure_repeat_start(line)?;

        let (builder, voice) = self.repeat_and_voice(line)?;
        let inside_ending = builder.body.is_some();
        if inside_ending {
            builder.endings.push(RepeatEnding {
                input_line: line,
                number: String::new(),
                kind: RepeatEndingKind::Hooked,
                chunk: voice.close_segment(line),
            });
        } else {
            builder.anchor = voice.segment_start();
            builder.body = Some(voice.close_segment(line));
        }

        if inside_ending {
            self.warning(line, "backward repeat inside an ending, closed as a hooked ending");
        }

        self.finalize_pending_repeat(line)
    }

    /// Give the open repeat an implicit start barline when no repeat start
    /// was seen for it
    ///
    /// The barline goes at the beginning of the body: into the already
    /// closed body chunk, or at the start of the still open segment.
    fn ensure_repeat_start(&mut self, line: usize) -> Result<(), TranslationError> {
        let started = match &self.session.repeat {
            Some(builder) => builder.start.is_some(),
            None => return Ok(()),
        };
        let start_pending = self
            .session
            .pending_barlines
            .iter()
            .any(|barline| barline.category == BarlineCategory::RepeatStart);

        if started || start_pending {
            return Ok(());
        }

        let (builder, voice) = self.repeat_and_voice(line)?;

        let measure_number = match &builder.body {
            Some(body) => first_measure_number(&body.elements),
            None => {
                let start = voice.segment_start().min(voice.elements().len());
                first_measure_number(&voice.elements()[start..])
            }
        };
        let implicit = VoiceElement::Barline(Barline::implicit_repeat_start(
            MeasureLocation::new(measure_number.clone(), Rational::from_integer(0)),
            line,
        ));

        match builder.body.as_mut() {
            Some(body) => body.prepend(implicit),
            None => voice.prepend_to_segment(implicit),
        }
        builder.start = Some(RepeatStartKind::Implicit);

        trace_event!(
            self,
            "implicit repeat start synthesized in measure {} for the end at line {}",
            measure_number,
            line
        );
        Ok(())
    }

    /// Finish the repeat under construction, if any
    pub(super) fn finalize_pending_repeat(&mut self, line: usize) -> Result<(), TranslationError> {
        match self.session.repeat.take() {
            Some(builder) => self.finish_repeat(builder, line),
            None => Ok(()),
        }
    }

    fn finish_repeat(&mut self, mut builder: RepeatBuilder, line: usize) -> Result<(), TranslationError> {
        self.pop_pending(BarlineCategory::RepeatStart);

        let voice = self.voice_mut(builder.voice, line)?;
        let body = match builder.body.take() {
            Some(body) => body,
            None => {
                builder.anchor = voice.segment_start();
                voice.close_segment(line)
            }
        };

        let repeat = Repeat {
            input_line: builder.input_line,
            body,
            endings: builder.endings,
            implicit_start: builder.start == Some(RepeatStartKind::Implicit),
        };
        let endings = repeat.endings.len();
        voice.insert_repeat(builder.anchor, repeat);

        trace_event!(
            self,
            "repeat from line {} finished at line {} with {} ending(s)",
            builder.input_line,
            line,
            endings
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msr::BarCheck;

    #[test]
    fn test_first_measure_number_skips_other_events() {
        let elements = vec![
            VoiceElement::Barline(Barline::default()),
            VoiceElement::BarCheck(BarCheck {
                measure_number: "5".to_string(),
                input_line: 3,
            }),
            VoiceElement::BarCheck(BarCheck {
                measure_number: "6".to_string(),
                input_line: 9,
            }),
        ];

        assert_eq!(first_measure_number(&elements), "5");
        assert_eq!(first_measure_number(&[]), "");
    }
}
