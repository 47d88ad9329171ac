//! The MusicXML → MSR translator
//!
//! `MsrTranslator` implements `ElementVisitor`: the browser feeds it
//! enter/exit events in document order and a single `match` on
//! `ElementKind` routes each one to its handler. Handlers for notes,
//! barlines and lyrics live in sibling modules as further `impl` blocks.

use crate::converters::musicxml::musicxml_to_msr::browser::ElementVisitor;
use crate::converters::musicxml::musicxml_to_msr::element::{ElementKind, MusicXmlElement};
use crate::converters::musicxml::musicxml_to_msr::errors::TranslationError;
use crate::converters::musicxml::musicxml_to_msr::registries::{
    PartGroupRegistry, PartGroupStart, PartRegistry,
};
use crate::converters::musicxml::musicxml_to_msr::session::{
    voice_at, ClefAccumulator, DirectionAccumulator, KeyAccumulator, MotionAccumulator,
    ParsingContext, PartGroupAccumulator, ScorePartAccumulator, TimeAccumulator,
    TranslationSession, VoiceAddress,
};
use crate::converters::musicxml::musicxml_to_msr::types::{TranslationResult, TranslationSettings};
use crate::diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics};
use crate::msr::{
    BarCheck, BarNumberCheck, Break, Clef, ClefSign, Creator, Dynamics, DynamicsKind, Key,
    KeyMode, Part, PartGroupSymbol, PartIndex, Placement, Rational, Score, Tempo, Time,
    TimeSymbol, Voice, VoiceElement, Wedge, WedgeKind,
};
use crate::utils::spell_out_numbers;

pub struct MsrTranslator {
    pub(super) settings: TranslationSettings,
    pub(super) score: Score,
    pub(super) session: TranslationSession,
    pub(super) part_groups: PartGroupRegistry,
    pub(super) parts: PartRegistry,
    pub(super) diagnostics: Diagnostics,
}

impl MsrTranslator {
    pub fn new(settings: TranslationSettings) -> Self {
        Self {
            settings,
            score: Score::new(),
            session: TranslationSession::new(),
            part_groups: PartGroupRegistry::new(),
            parts: PartRegistry::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_result(self) -> TranslationResult {
        TranslationResult {
            score: self.score,
            diagnostics: self.diagnostics,
        }
    }

    // ========================================================================
    // DIAGNOSTICS
    // ========================================================================

    pub(super) fn warning(&mut self, line: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(
            DiagnosticSeverity::Warning,
            self.settings.input_source_name.clone(),
            line,
            message,
        );
        self.diagnostics.add(diagnostic);
    }

    pub(super) fn musicxml_error(&mut self, line: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(
            DiagnosticSeverity::Error,
            self.settings.input_source_name.clone(),
            line,
            message,
        );
        self.diagnostics.add(diagnostic);
    }

    pub(super) fn internal_error(&self, line: usize, message: impl Into<String>) -> TranslationError {
        let err = TranslationError::internal(self.settings.input_source_name.clone(), line, message);
        log::error!("{}", err);
        err
    }

    // ========================================================================
    // CURRENT PART / VOICE
    // ========================================================================

    pub(super) fn current_part_index(&self, line: usize) -> Result<PartIndex, TranslationError> {
        self.session
            .part
            .ok_or_else(|| self.internal_error(line, "element found outside of any part"))
    }

    pub(super) fn current_part_mut(&mut self, line: usize) -> Result<&mut Part, TranslationError> {
        let index = self.current_part_index(line)?;
        let Self { score, settings, .. } = self;

        score.part_mut(index).ok_or_else(|| {
            TranslationError::internal(
                settings.input_source_name.clone(),
                line,
                format!("part index {} is not registered", index.0),
            )
        })
    }

    pub(super) fn current_voice_address(&self, line: usize) -> Result<VoiceAddress, TranslationError> {
        self.session
            .current_voice()
            .ok_or_else(|| self.internal_error(line, "element found outside of any part"))
    }

    /// Voice at `at`, created on first reference
    pub(super) fn voice_mut(
        &mut self,
        at: VoiceAddress,
        line: usize,
    ) -> Result<&mut Voice, TranslationError> {
        let Self { score, session, settings, .. } = self;

        voice_at(score, at, &session.measure_number, line).ok_or_else(|| {
            TranslationError::internal(
                settings.input_source_name.clone(),
                line,
                format!("part index {} is not registered", at.part.0),
            )
        })
    }

    pub(super) fn current_voice_mut(&mut self, line: usize) -> Result<&mut Voice, TranslationError> {
        let at = self.current_voice_address(line)?;
        self.voice_mut(at, line)
    }

    /// MusicXML divisions → whole notes, with the current part's divisions
    pub(super) fn whole_notes(&self, divisions: i32) -> Rational {
        let per_quarter = self
            .session
            .part
            .and_then(|index| self.score.part(index))
            .map(|part| part.divisions_per_quarter)
            .unwrap_or(1)
            .max(1);

        Rational::new(divisions as i64, per_quarter as i64 * 4)
    }

    fn logs_elements(&self) -> bool {
        self.settings.debug || self.session.debug_measure
    }

    // ========================================================================
    // IDENTIFICATION AND GEOMETRY
    // ========================================================================

    fn handle_identification(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let value = element.value().to_string();
        let identification = &mut self.score.identification;

        match kind {
            ElementKind::WorkNumber => identification.work_number = Some(value),
            ElementKind::WorkTitle => identification.work_title = Some(value),
            ElementKind::MovementNumber => identification.movement_number = Some(value),
            ElementKind::MovementTitle => identification.movement_title = Some(value),
            ElementKind::Creator => identification.creators.push(Creator {
                kind: element.attribute("type").unwrap_or("").to_string(),
                name: value,
            }),
            ElementKind::Rights => identification.rights = Some(value),
            ElementKind::Software => identification.software.push(value),
            ElementKind::EncodingDate => identification.encoding_date = Some(value),
            _ => {}
        }
    }

    fn handle_scaling(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let value = match element.float_value() {
            Some(value) if value > 0.0 => value,
            _ => {
                self.musicxml_error(
                    element.input_line(),
                    format!("{} \"{}\" is not a positive number", element.tag(), element.value()),
                );
                return;
            }
        };

        let geometry = &mut self.score.page_geometry;
        if kind == ElementKind::Millimeters {
            geometry.millimeters = value;
        } else {
            geometry.tenths = value;
        }
    }

    fn handle_page_length(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let Some(tenths) = element.float_value() else {
            self.musicxml_error(
                element.input_line(),
                format!("{} \"{}\" is not a number", element.tag(), element.value()),
            );
            return;
        };

        let geometry = &mut self.score.page_geometry;
        let centimeters = geometry.tenths_to_centimeters(tenths);

        let slot = match kind {
            ElementKind::PageHeight => &mut geometry.paper_height,
            ElementKind::PageWidth => &mut geometry.paper_width,
            ElementKind::LeftMargin => &mut geometry.left_margin,
            ElementKind::RightMargin => &mut geometry.right_margin,
            ElementKind::TopMargin => &mut geometry.top_margin,
            ElementKind::BottomMargin => &mut geometry.bottom_margin,
            ElementKind::SystemDistance => &mut geometry.between_system_space,
            ElementKind::TopSystemDistance => &mut geometry.page_top_space,
            _ => return,
        };
        *slot = Some(centimeters);
    }

    // ========================================================================
    // PART LIST
    // ========================================================================

    fn handle_part_group_start(&mut self, element: &dyn MusicXmlElement) {
        self.session.part_group = Some(PartGroupAccumulator {
            input_line: element.input_line(),
            number: element.int_attribute("number").unwrap_or(1),
            kind: element.attribute("type").map(str::to_string),
            ..PartGroupAccumulator::default()
        });
    }

    fn handle_part_group_child(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let value = element.value();

        let Some(group) = self.session.part_group.as_mut() else {
            return;
        };

        match kind {
            ElementKind::GroupName => group.name = value.to_string(),
            ElementKind::GroupAbbreviation => group.abbreviation = value.to_string(),
            ElementKind::GroupSymbol => {
                group.display_order_key = Some(
                    element
                        .float_attribute("default-x")
                        .map(|x| x.round() as i32)
                        .unwrap_or(0),
                );
                match PartGroupSymbol::from_musicxml(value) {
                    Some(symbol) => group.symbol = symbol,
                    None => {
                        group.symbol = PartGroupSymbol::None;
                        self.musicxml_error(line, format!("group-symbol \"{}\" is unknown", value));
                    }
                }
            }
            ElementKind::GroupBarline => match value {
                "yes" | "Mensurstrich" => group.barline = true,
                "no" => group.barline = false,
                _ => {
                    group.barline = false;
                    self.musicxml_error(line, format!("group-barline \"{}\" is unknown", value));
                }
            },
            _ => {}
        }
    }

    fn handle_part_group_end(&mut self) -> Result<(), TranslationError> {
        let Some(group) = self.session.part_group.take() else {
            return Ok(());
        };
        let line = group.input_line;

        match group.kind.as_deref() {
            Some("start") => {
                if let Some(implicit) = self.part_groups.implicit_number() {
                    self.close_part_group(implicit, line)?;
                }

                if self.part_groups.resolve(group.number).is_some() {
                    self.musicxml_error(
                        line,
                        format!("part group {} is already open, start ignored", group.number),
                    );
                    return Ok(());
                }

                let absolute = self.part_groups.open(PartGroupStart {
                    number: group.number,
                    name: group.name,
                    abbreviation: group.abbreviation,
                    symbol: group.symbol,
                    display_order_key: group.display_order_key.unwrap_or(i32::MIN),
                    barline: group.barline,
                    implicit: false,
                    input_line: line,
                });
                trace_event!(
                    self,
                    "opening part group {} (absolute {}) at line {}",
                    group.number,
                    absolute,
                    line
                );
            }
            Some("stop") => self.close_part_group(group.number, line)?,
            other => {
                self.musicxml_error(
                    line,
                    format!("part-group type \"{}\" is unknown", other.unwrap_or("")),
                );
            }
        }

        Ok(())
    }

    fn close_part_group(&mut self, number: i32, line: usize) -> Result<(), TranslationError> {
        self.part_groups
            .close(number, &mut self.score)
            .map_err(|err| self.internal_error(line, err.to_string()))?;

        trace_event!(self, "closing part group {} at line {}", number, line);
        Ok(())
    }

    fn handle_score_part_start(&mut self, element: &dyn MusicXmlElement) {
        let id = element.attribute("id").unwrap_or("").trim().replace(' ', "_");
        if id.is_empty() {
            self.musicxml_error(element.input_line(), "score-part has no id");
        }

        self.session.score_part = Some(ScorePartAccumulator {
            input_line: element.input_line(),
            id,
            ..ScorePartAccumulator::default()
        });
    }

    fn handle_score_part_child(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let Some(score_part) = self.session.score_part.as_mut() else {
            return;
        };
        let value = element.value().to_string();

        match kind {
            ElementKind::PartName => score_part.name = value,
            ElementKind::PartAbbreviation => score_part.abbreviation = value,
            ElementKind::InstrumentName => score_part.instrument_name = value,
            _ => {}
        }
    }

    fn handle_score_part_end(&mut self) {
        let Some(score_part) = self.session.score_part.take() else {
            return;
        };
        let line = score_part.input_line;

        if self.parts.contains(&score_part.id) {
            self.warning(
                line,
                format!("part \"{}\" is declared more than once, ignored", score_part.id),
            );
            return;
        }

        if self.part_groups.is_empty() {
            self.part_groups.open(PartGroupStart::implicit(line));
            trace_event!(self, "creating implicit part group at line {}", line);
        }

        let msr_name = self
            .settings
            .renamed_part(&score_part.id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Part_{}", spell_out_numbers(&score_part.id)));

        let mut part = Part::new(score_part.id.clone(), msr_name, line);
        part.name = score_part.name;
        part.abbreviation = score_part.abbreviation;
        part.instrument_name = score_part.instrument_name;
        part.part_group_number = self.part_groups.current_mut().map(|group| group.number);

        trace_event!(self, "registering part \"{}\" as {} at line {}", part.id, part.msr_name, line);

        let index = self.score.add_part(part);
        self.parts.register(score_part.id, index);
        if let Some(group) = self.part_groups.current_mut() {
            group.add_part(index);
        }
    }

    fn handle_part_list_end(&mut self, line: usize) -> Result<(), TranslationError> {
        if let Some(implicit) = self.part_groups.implicit_number() {
            self.close_part_group(implicit, line)?;
        }
        Ok(())
    }

    // ========================================================================
    // PARTS AND MEASURES
    // ========================================================================

    fn handle_part_start(&mut self, element: &dyn MusicXmlElement) -> Result<(), TranslationError> {
        let line = element.input_line();
        let id = element.attribute("id").unwrap_or("").trim().replace(' ', "_");

        let index = self
            .parts
            .lookup(&id)
            .ok_or_else(|| self.internal_error(line, format!("part \"{}\" is not in the part list", id)))?;

        self.session.enter_part(index);
        self.current_voice_mut(line)?;

        trace_event!(self, "entering part \"{}\" at line {}", id, line);
        Ok(())
    }

    fn handle_part_end(&mut self, line: usize) -> Result<(), TranslationError> {
        self.finalize_pending_tuplets(line)?;

        let unended = self
            .session
            .repeat
            .as_ref()
            .filter(|builder| builder.body.is_none() && builder.endings.is_empty())
            .map(|builder| builder.input_line);
        if let Some(start_line) = unended {
            self.warning(start_line, "repeat is never ended, closed at the end of the part");
        }
        self.finalize_pending_repeat(line)?;

        let unmatched = std::mem::take(&mut self.session.pending_barlines);
        for barline in unmatched {
            self.warning(
                barline.input_line,
                format!("{:?} barline is never matched", barline.category),
            );
        }

        self.session.part = None;
        Ok(())
    }

    fn handle_measure_start(&mut self, element: &dyn MusicXmlElement) -> Result<(), TranslationError> {
        let line = element.input_line();
        self.finalize_pending_tuplets(line)?;

        let implicit = element.yes_attribute("implicit");
        self.session.measure_number = match element.attribute("number").map(str::trim) {
            Some(number) if !number.is_empty() => number.to_string(),
            // anacrusis
            _ if implicit => "0".to_string(),
            _ => String::new(),
        };
        self.session.debug_measure = self.settings.debugs_measure(&self.session.measure_number);

        let measure_number = self.session.measure_number.clone();
        for voice in self.current_part_mut(line)?.voices_mut() {
            voice.start_measure(&measure_number);
        }

        if !implicit && measure_number != "0" {
            self.current_voice_mut(line)?
                .append(VoiceElement::BarCheck(BarCheck {
                    measure_number: measure_number.clone(),
                    input_line: line,
                }));
        }

        trace_event!(self, "measure {} at line {}", measure_number, line);
        Ok(())
    }

    fn handle_measure_end(&mut self, line: usize) -> Result<(), TranslationError> {
        self.finalize_pending_tuplets(line)?;
        self.session.chord_in_progress = false;
        self.session.debug_measure = false;
        Ok(())
    }

    fn handle_print(&mut self, element: &dyn MusicXmlElement) -> Result<(), TranslationError> {
        let line = element.input_line();

        match element.attribute("new-system") {
            None | Some("no") => {}
            Some("yes") => {
                let measure_number = self.session.measure_number.clone();
                let voice = self.current_voice_mut(line)?;
                voice.append(VoiceElement::BarNumberCheck(BarNumberCheck {
                    measure_number: measure_number.clone(),
                    input_line: line,
                }));
                voice.append(VoiceElement::Break(Break {
                    measure_number,
                    input_line: line,
                }));
            }
            Some(other) => {
                self.musicxml_error(line, format!("print new-system \"{}\" is unknown", other));
            }
        }
        Ok(())
    }

    // ========================================================================
    // ATTRIBUTES
    // ========================================================================

    fn handle_divisions(&mut self, element: &dyn MusicXmlElement) -> Result<(), TranslationError> {
        let line = element.input_line();

        match element.int_value() {
            Some(divisions) if divisions > 0 => {
                self.current_part_mut(line)?.divisions_per_quarter = divisions;
            }
            _ => self.musicxml_error(
                line,
                format!("divisions \"{}\" is not a positive integer", element.value()),
            ),
        }
        Ok(())
    }

    fn handle_staves(&mut self, element: &dyn MusicXmlElement) -> Result<(), TranslationError> {
        let line = element.input_line();

        let Some(count) = element.int_value().filter(|count| *count > 0) else {
            self.musicxml_error(line, format!("staves \"{}\" is not a positive integer", element.value()));
            return Ok(());
        };

        let part = self.current_part_mut(line)?;
        let mut collision = None;
        for number in 2..=count {
            if part.staff(number).is_none() {
                if let Err(err) = part.add_staff(number, line) {
                    collision = Some(err);
                    break;
                }
            }
        }

        match collision {
            Some(err) => Err(self.internal_error(line, err.to_string())),
            None => Ok(()),
        }
    }

    fn handle_clef_start(&mut self, element: &dyn MusicXmlElement) {
        self.session.clef = Some(ClefAccumulator {
            input_line: element.input_line(),
            staff_number: element.int_attribute("number").unwrap_or(0),
            ..ClefAccumulator::default()
        });
    }

    fn handle_clef_child(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let Some(clef) = self.session.clef.as_mut() else {
            return;
        };

        match kind {
            ElementKind::Sign => clef.sign = Some(element.value().to_string()),
            ElementKind::Line => match element.int_value() {
                Some(value) => clef.line = Some(value),
                None => self.musicxml_error(line, format!("clef line \"{}\" is not a number", element.value())),
            },
            ElementKind::ClefOctaveChange => clef.octave_change = element.int_value().unwrap_or(0),
            _ => {}
        }
    }

    fn handle_clef_end(&mut self) -> Result<(), TranslationError> {
        let Some(clef) = self.session.clef.take() else {
            return Ok(());
        };
        let line = clef.input_line;
        let sign_text = clef.sign.unwrap_or_default();

        let Some(sign) = ClefSign::from_musicxml(&sign_text) else {
            self.musicxml_error(line, format!("clef sign \"{}\" is unknown, clef ignored", sign_text));
            return Ok(());
        };

        let value = Clef::new(sign, clef.line, clef.octave_change, line);
        self.current_part_mut(line)?.set_clef(clef.staff_number, value, line);
        Ok(())
    }

    fn handle_key_start(&mut self, element: &dyn MusicXmlElement) {
        self.session.key = Some(KeyAccumulator {
            input_line: element.input_line(),
            staff_number: element.int_attribute("number").unwrap_or(0),
            ..KeyAccumulator::default()
        });
    }

    fn handle_key_child(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let Some(key) = self.session.key.as_mut() else {
            return;
        };

        match kind {
            ElementKind::Fifths => match element.int_value() {
                Some(fifths) => key.fifths = fifths,
                None => self.musicxml_error(line, format!("fifths \"{}\" is not a number", element.value())),
            },
            ElementKind::Mode => key.mode = Some(element.value().to_string()),
            ElementKind::Cancel => key.cancel = element.int_value(),
            _ => {}
        }
    }

    fn handle_key_end(&mut self) -> Result<(), TranslationError> {
        let Some(key) = self.session.key.take() else {
            return Ok(());
        };
        let line = key.input_line;

        let mode = match key.mode.as_deref() {
            None => KeyMode::Major,
            Some(text) => KeyMode::from_musicxml(text).unwrap_or_else(|| {
                self.musicxml_error(line, format!("key mode \"{}\" is unknown", text));
                KeyMode::None
            }),
        };

        let value = Key::new(key.fifths, mode, key.cancel, line);
        self.current_part_mut(line)?.set_key(key.staff_number, value, line);
        Ok(())
    }

    fn handle_time_start(&mut self, element: &dyn MusicXmlElement) {
        self.session.time = Some(TimeAccumulator {
            input_line: element.input_line(),
            staff_number: element.int_attribute("number").unwrap_or(0),
            symbol: element.attribute("symbol").map(str::to_string),
            ..TimeAccumulator::default()
        });
    }

    fn handle_time_child(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let Some(time) = self.session.time.as_mut() else {
            return;
        };

        match kind {
            ElementKind::Beats => time.beats = element.value().to_string(),
            ElementKind::BeatType => match element.int_value() {
                Some(beat_type) => time.beat_type = beat_type,
                None => self.musicxml_error(line, format!("beat-type \"{}\" is not a number", element.value())),
            },
            ElementKind::SenzaMisura => time.senza_misura = true,
            _ => {}
        }
    }

    fn handle_time_end(&mut self) -> Result<(), TranslationError> {
        let Some(time) = self.session.time.take() else {
            return Ok(());
        };
        let line = time.input_line;

        let symbol = match time.symbol.as_deref() {
            None => None,
            Some(text) => {
                let symbol = TimeSymbol::from_musicxml(text);
                if symbol.is_none() {
                    self.musicxml_error(line, format!("time symbol \"{}\" is unknown", text));
                }
                symbol
            }
        };

        let value = Time::new(time.beats, time.beat_type, time.senza_misura, symbol, line);
        self.current_part_mut(line)?.set_time(time.staff_number, value, line);
        Ok(())
    }

    // ========================================================================
    // CONTEXT-DEPENDENT ELEMENTS
    // ========================================================================

    fn handle_staff(&mut self, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let Some(number) = element.int_value() else {
            self.musicxml_error(line, format!("staff \"{}\" is not a number", element.value()));
            return;
        };

        match self.session.context {
            ParsingContext::InNote => self.session.note.staff = number,
            ParsingContext::InForward => self.session.motion.staff = Some(number),
            ParsingContext::InDirection => {
                if let Some(direction) = self.session.direction.as_mut() {
                    direction.staff = Some(number);
                }
            }
            ParsingContext::InBackup | ParsingContext::None => {
                self.warning(line, "staff element out of context, ignored");
            }
        }
    }

    fn handle_voice(&mut self, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let Some(number) = element.int_value() else {
            self.musicxml_error(line, format!("voice \"{}\" is not a number", element.value()));
            return;
        };

        match self.session.context {
            ParsingContext::InNote => self.session.note.voice = number,
            ParsingContext::InForward => self.session.motion.voice = Some(number),
            ParsingContext::InDirection => {
                if let Some(direction) = self.session.direction.as_mut() {
                    direction.voice = Some(number);
                }
            }
            ParsingContext::InBackup | ParsingContext::None => {
                self.musicxml_error(line, "voice element out of context, ignored");
            }
        }
    }

    fn handle_duration(&mut self, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let Some(duration) = element.int_value().filter(|d| *d >= 0) else {
            self.musicxml_error(line, format!("duration \"{}\" is not a valid number", element.value()));
            return;
        };

        match self.session.context {
            ParsingContext::InNote => self.session.note.duration = Some(duration),
            ParsingContext::InBackup | ParsingContext::InForward => {
                self.session.motion.duration = Some(duration);
            }
            ParsingContext::InDirection | ParsingContext::None => {
                self.warning(line, "duration element out of context, ignored");
            }
        }
    }

    // ========================================================================
    // DIRECTIONS
    // ========================================================================

    fn handle_direction_start(&mut self, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let placement = self.placement_attribute(element);

        self.session.context = ParsingContext::InDirection;
        self.session.direction = Some(DirectionAccumulator {
            input_line: line,
            placement,
            ..DirectionAccumulator::default()
        });
    }

    /// `placement` attribute; unknown values are reported and dropped
    pub(super) fn placement_attribute(&mut self, element: &dyn MusicXmlElement) -> Option<Placement> {
        let text = element.attribute("placement")?;
        let placement = Placement::from_musicxml(text);
        if placement.is_none() {
            self.musicxml_error(
                element.input_line(),
                format!("{} placement \"{}\" is unknown", element.tag(), text),
            );
        }
        placement
    }

    fn handle_direction_child(&mut self, kind: ElementKind, element: &dyn MusicXmlElement) {
        let Some(direction) = self.session.direction.as_mut() else {
            return;
        };
        let value = element.value();

        match kind {
            ElementKind::Words => {
                if !value.is_empty() {
                    direction.words.push(value.to_string());
                }
            }
            ElementKind::Metronome => {
                direction.metronome = true;
                direction.parentheses = element.yes_attribute("parentheses");
            }
            ElementKind::BeatUnit => direction.beat_unit = Some(value.to_string()),
            ElementKind::BeatUnitDot => direction.beat_unit_dots += 1,
            ElementKind::PerMinute => direction.per_minute = Some(value.to_string()),
            _ => {}
        }
    }

    fn handle_dynamics(&mut self, kind: DynamicsKind, element: &dyn MusicXmlElement) {
        let placement = self.session.direction.as_ref().and_then(|d| d.placement);

        self.session.pending_dynamics.push(Dynamics {
            kind,
            placement,
            input_line: element.input_line(),
        });
    }

    fn handle_wedge(&mut self, element: &dyn MusicXmlElement) {
        let line = element.input_line();
        let text = element.attribute("type").unwrap_or("");

        let Some(kind) = WedgeKind::from_musicxml(text) else {
            self.musicxml_error(line, format!("wedge type \"{}\" is unknown", text));
            return;
        };

        let placement = self.session.direction.as_ref().and_then(|d| d.placement);
        self.session.pending_wedges.push(Wedge {
            kind,
            placement,
            input_line: line,
        });
    }

    fn handle_direction_end(&mut self) -> Result<(), TranslationError> {
        self.session.context = ParsingContext::None;

        let Some(direction) = self.session.direction.take() else {
            return Ok(());
        };
        if direction.words.is_empty() && !direction.metronome {
            return Ok(());
        }

        let line = direction.input_line;
        let part = self.current_part_index(line)?;
        let at = VoiceAddress {
            part,
            staff: direction.staff.unwrap_or(self.session.staff_number),
            voice: direction.voice.unwrap_or(self.session.voice_number),
        };

        let voice = self.voice_mut(at, line)?;
        let tempo = Tempo {
            indication: direction.words.join(" "),
            beat_unit: direction.beat_unit,
            beat_unit_dots: direction.beat_unit_dots,
            per_minute: direction.per_minute,
            parentheses: direction.parentheses,
            location: voice.location.clone(),
            input_line: line,
        };
        voice.append(VoiceElement::Tempo(tempo));
        Ok(())
    }

    // ========================================================================
    // DOCUMENT END
    // ========================================================================

    fn handle_score_end(&mut self, line: usize) -> Result<(), TranslationError> {
        for number in self.part_groups.open_numbers_innermost_first() {
            self.warning(line, format!("part group {} is never closed, closing it", number));
            self.close_part_group(number, line)?;
        }

        let without_staves: Vec<(String, usize)> = self
            .score
            .parts
            .iter()
            .filter(|part| part.staves.is_empty())
            .map(|part| (part.id.clone(), part.input_line))
            .collect();
        for (id, part_line) in without_staves {
            self.warning(part_line, format!("part \"{}\" has no content", id));
        }

        trace_event!(
            self,
            "translation of {} done: {} part(s), {} diagnostic(s)",
            self.settings.input_source_name,
            self.score.parts.len(),
            self.diagnostics.len()
        );
        Ok(())
    }
}

impl ElementVisitor for MsrTranslator {
    fn visit_start(
        &mut self,
        kind: ElementKind,
        element: &dyn MusicXmlElement,
    ) -> Result<(), TranslationError> {
        if self.logs_elements() {
            log::debug!("--> {} (line {})", element.tag(), element.input_line());
        }

        use ElementKind as K;
        match kind {
            K::ScorePartwise => {
                trace_event!(self, "translating {}", self.settings.input_source_name);
            }

            K::WorkNumber
            | K::WorkTitle
            | K::MovementNumber
            | K::MovementTitle
            | K::Creator
            | K::Rights
            | K::Software
            | K::EncodingDate => self.handle_identification(kind, element),

            K::Millimeters | K::Tenths => self.handle_scaling(kind, element),
            K::PageHeight
            | K::PageWidth
            | K::LeftMargin
            | K::RightMargin
            | K::TopMargin
            | K::BottomMargin
            | K::SystemDistance
            | K::TopSystemDistance => self.handle_page_length(kind, element),

            K::PartList => {}
            K::PartGroup => self.handle_part_group_start(element),
            K::GroupName | K::GroupAbbreviation | K::GroupSymbol | K::GroupBarline => {
                self.handle_part_group_child(kind, element)
            }
            K::ScorePart => self.handle_score_part_start(element),
            K::PartName | K::PartAbbreviation | K::InstrumentName => {
                self.handle_score_part_child(kind, element)
            }

            K::Part => self.handle_part_start(element)?,
            K::Measure => self.handle_measure_start(element)?,
            K::Print => self.handle_print(element)?,

            K::Divisions => self.handle_divisions(element)?,
            K::Staves => self.handle_staves(element)?,
            K::Clef => self.handle_clef_start(element),
            K::Sign | K::Line | K::ClefOctaveChange => self.handle_clef_child(kind, element),
            K::Key => self.handle_key_start(element),
            K::Cancel | K::Fifths | K::Mode => self.handle_key_child(kind, element),
            K::Time => self.handle_time_start(element),
            K::Beats | K::BeatType | K::SenzaMisura => self.handle_time_child(kind, element),

            K::Staff => self.handle_staff(element),
            K::Voice => self.handle_voice(element),
            K::Duration => self.handle_duration(element),

            K::Direction => self.handle_direction_start(element),
            K::Words | K::Metronome | K::BeatUnit | K::BeatUnitDot | K::PerMinute => {
                self.handle_direction_child(kind, element)
            }
            K::Dynamics(dynamics) => self.handle_dynamics(dynamics, element),
            K::Wedge => self.handle_wedge(element),

            K::Backup => {
                self.session.context = ParsingContext::InBackup;
                self.session.motion = MotionAccumulator {
                    input_line: element.input_line(),
                    ..MotionAccumulator::default()
                };
            }
            K::Forward => {
                self.session.context = ParsingContext::InForward;
                self.session.motion = MotionAccumulator {
                    input_line: element.input_line(),
                    ..MotionAccumulator::default()
                };
            }

            K::Barline => self.handle_barline_start(element),
            K::BarStyle | K::Ending | K::Repeat => self.handle_barline_child(kind, element),

            K::Note => self.handle_note_start(element),
            K::Step
            | K::Alter
            | K::Octave
            | K::DisplayStep
            | K::DisplayOctave
            | K::Rest
            | K::Unpitched
            | K::Grace
            | K::Chord
            | K::Dot
            | K::Type
            | K::Stem
            | K::Beam
            | K::Tie
            | K::Tied
            | K::Slur
            | K::TimeModification
            | K::ActualNotes
            | K::NormalNotes
            | K::NormalType
            | K::Tuplet => self.handle_note_child(kind, element),
            K::Articulation(articulation) => self.handle_articulation(articulation, element),

            K::Lyric => self.handle_lyric_start(element),
            K::Syllabic | K::Text | K::Elision => self.handle_lyric_child(kind, element),
        }

        Ok(())
    }

    fn visit_end(
        &mut self,
        kind: ElementKind,
        element: &dyn MusicXmlElement,
    ) -> Result<(), TranslationError> {
        let line = element.input_line();

        use ElementKind as K;
        match kind {
            K::ScorePartwise => self.handle_score_end(line)?,
            K::PartList => self.handle_part_list_end(line)?,
            K::PartGroup => self.handle_part_group_end()?,
            K::ScorePart => self.handle_score_part_end(),
            K::Part => self.handle_part_end(line)?,
            K::Measure => self.handle_measure_end(line)?,
            K::Clef => self.handle_clef_end()?,
            K::Key => self.handle_key_end()?,
            K::Time => self.handle_time_end()?,
            K::Direction => self.handle_direction_end()?,
            K::Backup => self.handle_backup_end()?,
            K::Forward => self.handle_forward_end()?,
            K::Barline => self.handle_barline_end()?,
            K::Note => self.handle_note_end()?,
            K::Lyric => self.handle_lyric_end(),
            _ => {}
        }

        if self.logs_elements() {
            log::debug!("<-- {} (line {})", element.tag(), line);
        }
        Ok(())
    }
}
