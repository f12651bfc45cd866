use crate::{
    foundation::{
        core::{Point, Year},
        error::{LayerlineError, LayerlineResult},
    },
    geometry::layout::{Placement, SceneLayout},
    timeline::{
        diagram::{Diagram, EventRemoval, LayerRemoval},
        ids::{EventId, LayerId},
        model::{Column, ConnectionStyle, EventSpec, Trend},
    },
};

/// Prefill for the event form. `layer` is `None` only when the diagram has no layers yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventDraft {
    pub layer: Option<LayerId>,
    pub year: Year,
}

/// What the interactive surface is doing. Forms are modal: while one is open, only its submit
/// and cancel actions are accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Idle,
    Selected(EventId),
    PlacingEvent(EventDraft),
    EditingEvent(EventId),
    ConnectingFrom(EventId),
    AwaitingConnectionProperties {
        from: EventId,
        to: EventId,
    },
    DraggingEvent(EventId),
    AddingLayer,
    AddingColumn,
    AddingTrend,
}

impl EditorState {
    /// No form open and no gesture in progress.
    pub fn is_browsing(self) -> bool {
        matches!(self, Self::Idle | Self::Selected(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditorAction {
    /// Pointer click in logical canvas coordinates.
    Click(Point),
    OpenEventForm,
    OpenLayerForm,
    OpenColumnForm,
    OpenTrendForm,
    EditEvent(EventId),
    StartConnecting(EventId),
    BeginDrag(EventId),
    /// Pointer release of a drag, in logical canvas coordinates.
    Drop(Point),
    DeleteEvent(EventId),
    RemoveLayer(LayerId),
    SetYearRange { start_year: Year, end_year: Year },
    SubmitEvent(EventSpec),
    SubmitLayer(String),
    SubmitColumn(Column),
    SubmitTrend(Trend),
    SubmitConnection(ConnectionStyle),
    Cancel,
}

impl EditorAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Click(_) => "click",
            Self::OpenEventForm => "open event form",
            Self::OpenLayerForm => "open layer form",
            Self::OpenColumnForm => "open column form",
            Self::OpenTrendForm => "open trend form",
            Self::EditEvent(_) => "edit event",
            Self::StartConnecting(_) => "start connecting",
            Self::BeginDrag(_) => "begin drag",
            Self::Drop(_) => "drop",
            Self::DeleteEvent(_) => "delete event",
            Self::RemoveLayer(_) => "remove layer",
            Self::SetYearRange { .. } => "set year range",
            Self::SubmitEvent(_) => "submit event",
            Self::SubmitLayer(_) => "submit layer",
            Self::SubmitColumn(_) => "submit column",
            Self::SubmitTrend(_) => "submit trend",
            Self::SubmitConnection(_) => "submit connection",
            Self::Cancel => "cancel",
        }
    }
}

/// Result of an accepted action.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Accepted but nothing changed (e.g. a click below the layer bands).
    Ignored,
    StateChanged,
    LayerAdded(LayerId),
    LayerRemoved(LayerRemoval),
    EventAdded(EventId),
    EventUpdated(EventId),
    EventMoved(EventId),
    EventRemoved(EventRemoval),
    ConnectionAdded(usize),
    ColumnAdded(usize),
    TrendAdded(usize),
    YearRangeChanged,
}

/// A diagram plus the interaction state driving its edits.
///
/// Rejected actions leave both the state and the diagram as they were.
#[derive(Clone, Debug)]
pub struct EditorSession {
    diagram: Diagram,
    state: EditorState,
    canvas_width: f64,
}

impl EditorSession {
    pub fn new(diagram: Diagram, canvas_width: f64) -> Self {
        Self {
            diagram,
            state: EditorState::Idle,
            canvas_width,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn layout(&self) -> SceneLayout {
        SceneLayout::new(&self.diagram, self.canvas_width)
    }

    pub fn apply(&mut self, action: EditorAction) -> LayerlineResult<Outcome> {
        let (next, outcome) = self.step(action)?;
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, "editor transition");
        }
        self.state = next;
        Ok(outcome)
    }

    fn step(&mut self, action: EditorAction) -> LayerlineResult<(EditorState, Outcome)> {
        use EditorState as S;

        let name = action.name();
        let state = self.state;
        match action {
            EditorAction::Click(point) => self.click(point),
            EditorAction::Drop(point) => match state {
                S::DraggingEvent(id) => match self.placement(point) {
                    Some((layer, placement)) => {
                        self.diagram.move_event(id, placement.year, layer)?;
                        Ok((S::Idle, Outcome::EventMoved(id)))
                    }
                    None => Ok((S::Idle, Outcome::Ignored)),
                },
                _ => Err(invalid(name, state)),
            },
            EditorAction::Cancel => match state {
                S::Idle => Ok((S::Idle, Outcome::Ignored)),
                _ => Ok((S::Idle, Outcome::StateChanged)),
            },

            EditorAction::OpenEventForm => {
                self.require_browsing(name)?;
                let draft = EventDraft {
                    layer: self.diagram.layers().first().map(|l| l.id),
                    year: self.diagram.config().mid_year(),
                };
                Ok((S::PlacingEvent(draft), Outcome::StateChanged))
            }
            EditorAction::OpenLayerForm => {
                self.require_browsing(name)?;
                Ok((S::AddingLayer, Outcome::StateChanged))
            }
            EditorAction::OpenColumnForm => {
                self.require_browsing(name)?;
                Ok((S::AddingColumn, Outcome::StateChanged))
            }
            EditorAction::OpenTrendForm => {
                self.require_browsing(name)?;
                Ok((S::AddingTrend, Outcome::StateChanged))
            }
            EditorAction::EditEvent(id) => {
                self.require_browsing(name)?;
                self.require_event(id)?;
                Ok((S::EditingEvent(id), Outcome::StateChanged))
            }
            EditorAction::StartConnecting(id) => {
                self.require_browsing(name)?;
                self.require_event(id)?;
                Ok((S::ConnectingFrom(id), Outcome::StateChanged))
            }
            EditorAction::BeginDrag(id) => {
                self.require_browsing(name)?;
                self.require_event(id)?;
                Ok((S::DraggingEvent(id), Outcome::StateChanged))
            }
            EditorAction::DeleteEvent(id) => {
                self.require_browsing(name)?;
                let removal = self.diagram.remove_event(id)?;
                Ok((S::Idle, Outcome::EventRemoved(removal)))
            }
            EditorAction::RemoveLayer(id) => {
                self.require_browsing(name)?;
                let removal = self.diagram.remove_layer(id)?;
                let next = match state {
                    S::Selected(e) if self.diagram.event(e).is_some() => state,
                    _ => S::Idle,
                };
                Ok((next, Outcome::LayerRemoved(removal)))
            }
            EditorAction::SetYearRange {
                start_year,
                end_year,
            } => {
                self.require_browsing(name)?;
                self.diagram.set_year_range(start_year, end_year)?;
                Ok((state, Outcome::YearRangeChanged))
            }

            EditorAction::SubmitEvent(spec) => match state {
                S::PlacingEvent(_) => {
                    let id = self.diagram.add_event(spec)?;
                    Ok((S::Idle, Outcome::EventAdded(id)))
                }
                S::EditingEvent(id) => {
                    self.diagram.update_event(id, spec)?;
                    Ok((S::Idle, Outcome::EventUpdated(id)))
                }
                _ => Err(invalid(name, state)),
            },
            EditorAction::SubmitLayer(layer_name) => match state {
                S::AddingLayer => {
                    let id = self.diagram.add_layer(layer_name)?;
                    Ok((S::Idle, Outcome::LayerAdded(id)))
                }
                _ => Err(invalid(name, state)),
            },
            EditorAction::SubmitColumn(column) => match state {
                S::AddingColumn => {
                    let index = self.diagram.add_column(column)?;
                    Ok((S::Idle, Outcome::ColumnAdded(index)))
                }
                _ => Err(invalid(name, state)),
            },
            EditorAction::SubmitTrend(trend) => match state {
                S::AddingTrend => {
                    let index = self.diagram.add_trend(trend)?;
                    Ok((S::Idle, Outcome::TrendAdded(index)))
                }
                _ => Err(invalid(name, state)),
            },
            EditorAction::SubmitConnection(style) => match state {
                S::AwaitingConnectionProperties { from, to } => {
                    let index = self.diagram.add_connection(from, to, style)?;
                    Ok((S::Idle, Outcome::ConnectionAdded(index)))
                }
                _ => Err(invalid(name, state)),
            },
        }
    }

    fn click(&mut self, point: Point) -> LayerlineResult<(EditorState, Outcome)> {
        use EditorState as S;

        let hit = self.layout().hit_event(&self.diagram, point);
        match (self.state, hit) {
            (S::ConnectingFrom(from), Some(to)) if from == to => Ok((S::Idle, Outcome::StateChanged)),
            (S::ConnectingFrom(from), Some(to)) => Ok((
                S::AwaitingConnectionProperties { from, to },
                Outcome::StateChanged,
            )),
            (S::Idle | S::Selected(_), Some(id)) => Ok((S::Selected(id), Outcome::StateChanged)),
            (S::Idle | S::Selected(_), None) => match self.placement(point) {
                Some((layer, placement)) => Ok((
                    S::PlacingEvent(EventDraft {
                        layer: Some(layer),
                        year: placement.year,
                    }),
                    Outcome::StateChanged,
                )),
                None => Ok((self.state, Outcome::Ignored)),
            },
            (state, _) => Err(invalid("click", state)),
        }
    }

    fn placement(&self, point: Point) -> Option<(LayerId, Placement)> {
        let placement = self.layout().locate(point)?;
        let layer = self.diagram.layers().get(placement.layer_index)?.id;
        Some((layer, placement))
    }

    fn require_browsing(&self, action: &str) -> LayerlineResult<()> {
        if self.state.is_browsing() {
            Ok(())
        } else {
            Err(invalid(action, self.state))
        }
    }

    fn require_event(&self, id: EventId) -> LayerlineResult<()> {
        self.diagram
            .event(id)
            .map(|_| ())
            .ok_or_else(|| LayerlineError::reference(format!("unknown {id}")))
    }
}

fn invalid(action: &str, state: EditorState) -> LayerlineError {
    LayerlineError::transition(format!("cannot {action} while {state:?}"))
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
