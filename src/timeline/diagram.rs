use std::collections::HashMap;

use crate::{
    foundation::{
        core::Year,
        error::{LayerlineError, LayerlineResult},
    },
    geometry::projection::Projector,
    timeline::{
        ids::{EventId, IdAllocator, LayerId},
        model::{
            Column, Connection, ConnectionStyle, Event, EventSpec, Layer, MAX_TRENDS,
            TimelineConfig, Trend, require_label,
        },
    },
};

/// What a layer removal took with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerRemoval {
    pub layer: Layer,
    pub events: Vec<Event>,
    pub connections: Vec<Connection>,
}

/// What an event removal took with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRemoval {
    pub event: Event,
    pub connections: Vec<Connection>,
}

/// Root aggregate of a timeline chart.
///
/// Every child entity is owned here and every mutation goes through these methods, so the
/// reference invariants hold after each call:
///
/// - each event's layer resolves to a layer of this diagram,
/// - each connection's endpoints resolve to events of this diagram,
/// - at most [`MAX_TRENDS`] trends exist.
///
/// Layers and events carry stable identifiers; positions (the indices used by the
/// interchange document) are looked up on demand, so removing an entity never rewrites
/// references held by the survivors.
#[derive(Clone, Debug, Default)]
pub struct Diagram {
    config: TimelineConfig,
    layers: Vec<Layer>,
    events: Vec<Event>,
    connections: Vec<Connection>,
    columns: Vec<Column>,
    trends: Vec<Trend>,
    layer_pos: HashMap<LayerId, usize>,
    event_pos: HashMap<EventId, usize>,
    ids: IdAllocator,
}

impl Diagram {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> TimelineConfig {
        self.config
    }

    pub fn projector(&self) -> Projector {
        Projector::new(self.config)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn trends(&self) -> &[Trend] {
        &self.trends
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layer_index(id).map(|i| &self.layers[i])
    }

    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layer_pos.get(&id).copied()
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.event_index(id).map(|i| &self.events[i])
    }

    pub fn event_index(&self, id: EventId) -> Option<usize> {
        self.event_pos.get(&id).copied()
    }

    /// Horizontal position (percent of width) of an event under the current bounds.
    pub fn event_x(&self, id: EventId) -> Option<f64> {
        self.event(id).map(|e| self.projector().year_to_x(e.year))
    }

    /// Connection endpoints as event positions, the form the interchange document uses.
    pub fn connection_endpoints(&self, index: usize) -> Option<(usize, usize)> {
        let c = self.connections.get(index)?;
        Some((self.event_index(c.from)?, self.event_index(c.to)?))
    }

    pub fn trend_slots_left(&self) -> usize {
        MAX_TRENDS.saturating_sub(self.trends.len())
    }

    /// Change the axis bounds. Event positions follow automatically.
    pub fn set_year_range(&mut self, start_year: Year, end_year: Year) -> LayerlineResult<()> {
        self.config = TimelineConfig::new(start_year, end_year)?;
        Ok(())
    }

    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerlineResult<LayerId> {
        let name = name.into();
        require_label("layer", &name)?;
        let id = self.ids.layer();
        self.layer_pos.insert(id, self.layers.len());
        self.layers.push(Layer { id, name });
        Ok(id)
    }

    pub fn rename_layer(&mut self, id: LayerId, name: impl Into<String>) -> LayerlineResult<()> {
        let name = name.into();
        require_label("layer", &name)?;
        let index = self.require_layer(id)?;
        self.layers[index].name = name;
        Ok(())
    }

    /// Move a layer to `to_index`; events stay on the layer they belong to.
    pub fn move_layer(&mut self, id: LayerId, to_index: usize) -> LayerlineResult<()> {
        let from = self.require_layer(id)?;
        if to_index >= self.layers.len() {
            return Err(LayerlineError::reference(format!(
                "layer position {to_index} out of range (have {})",
                self.layers.len()
            )));
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to_index, layer);
        self.reindex_layers();
        Ok(())
    }

    /// Remove a layer together with its events and every connection touching them.
    pub fn remove_layer(&mut self, id: LayerId) -> LayerlineResult<LayerRemoval> {
        let index = self.require_layer(id)?;
        let layer = self.layers.remove(index);

        let (events, kept): (Vec<Event>, Vec<Event>) = std::mem::take(&mut self.events)
            .into_iter()
            .partition(|e| e.layer == id);
        self.events = kept;

        let (connections, kept): (Vec<Connection>, Vec<Connection>) =
            std::mem::take(&mut self.connections)
                .into_iter()
                .partition(|c| events.iter().any(|e| e.id == c.from || e.id == c.to));
        self.connections = kept;

        self.reindex_layers();
        self.reindex_events();
        tracing::debug!(
            layer = %id,
            events = events.len(),
            connections = connections.len(),
            "removed layer"
        );
        Ok(LayerRemoval {
            layer,
            events,
            connections,
        })
    }

    pub fn add_event(&mut self, spec: EventSpec) -> LayerlineResult<EventId> {
        self.check_event_spec(&spec)?;
        let id = self.ids.event();
        self.event_pos.insert(id, self.events.len());
        self.events.push(Event::from_spec(id, spec));
        Ok(id)
    }

    /// Replace every editable field of an event; its identity and connections are kept.
    pub fn update_event(&mut self, id: EventId, spec: EventSpec) -> LayerlineResult<()> {
        let index = self.require_event(id)?;
        self.check_event_spec(&spec)?;
        self.events[index] = Event::from_spec(id, spec);
        Ok(())
    }

    /// Drag-and-drop placement: new year and layer, everything else unchanged.
    pub fn move_event(&mut self, id: EventId, year: Year, layer: LayerId) -> LayerlineResult<()> {
        let index = self.require_event(id)?;
        self.require_layer(layer)?;
        let event = &mut self.events[index];
        event.year = year;
        event.layer = layer;
        Ok(())
    }

    /// Remove an event and every connection that starts or ends at it.
    pub fn remove_event(&mut self, id: EventId) -> LayerlineResult<EventRemoval> {
        let index = self.require_event(id)?;
        let event = self.events.remove(index);
        let (connections, kept): (Vec<Connection>, Vec<Connection>) =
            std::mem::take(&mut self.connections)
                .into_iter()
                .partition(|c| c.from == id || c.to == id);
        self.connections = kept;
        self.reindex_events();
        Ok(EventRemoval { event, connections })
    }

    pub fn add_connection(
        &mut self,
        from: EventId,
        to: EventId,
        style: ConnectionStyle,
    ) -> LayerlineResult<usize> {
        self.require_event(from)?;
        self.require_event(to)?;
        if from == to {
            return Err(LayerlineError::validation(format!(
                "connection from {from} to itself"
            )));
        }
        style.validate()?;
        self.connections.push(Connection { from, to, style });
        Ok(self.connections.len() - 1)
    }

    pub fn remove_connection(&mut self, index: usize) -> LayerlineResult<Connection> {
        if index >= self.connections.len() {
            return Err(LayerlineError::reference(format!(
                "connection {index} out of range (have {})",
                self.connections.len()
            )));
        }
        Ok(self.connections.remove(index))
    }

    pub fn add_column(&mut self, column: Column) -> LayerlineResult<usize> {
        require_label("column", &column.label)?;
        self.columns.push(column);
        Ok(self.columns.len() - 1)
    }

    pub fn remove_column(&mut self, index: usize) -> LayerlineResult<Column> {
        if index >= self.columns.len() {
            return Err(LayerlineError::reference(format!(
                "column {index} out of range (have {})",
                self.columns.len()
            )));
        }
        Ok(self.columns.remove(index))
    }

    /// Append a trend band. Fails without touching the diagram when [`MAX_TRENDS`] exist.
    pub fn add_trend(&mut self, trend: Trend) -> LayerlineResult<usize> {
        if self.trends.len() >= MAX_TRENDS {
            return Err(LayerlineError::capacity(format!(
                "maximum of {MAX_TRENDS} trends allowed"
            )));
        }
        require_label("trend", &trend.label)?;
        self.trends.push(trend);
        Ok(self.trends.len() - 1)
    }

    pub fn remove_trend(&mut self, index: usize) -> LayerlineResult<Trend> {
        if index >= self.trends.len() {
            return Err(LayerlineError::reference(format!(
                "trend {index} out of range (have {})",
                self.trends.len()
            )));
        }
        Ok(self.trends.remove(index))
    }

    /// Verify the reference invariants. Mutations keep them by construction; this exists for
    /// tests and for documents assembled outside the mutation surface.
    pub fn check_invariants(&self) -> LayerlineResult<()> {
        for (i, e) in self.events.iter().enumerate() {
            if self.layer_index(e.layer).is_none() {
                return Err(LayerlineError::reference(format!(
                    "event {i} ('{}') is on unknown {}",
                    e.label, e.layer
                )));
            }
            if self.event_index(e.id) != Some(i) {
                return Err(LayerlineError::reference(format!(
                    "event {i} position index is stale"
                )));
            }
        }
        for (i, c) in self.connections.iter().enumerate() {
            if self.event_index(c.from).is_none() || self.event_index(c.to).is_none() {
                return Err(LayerlineError::reference(format!(
                    "connection {i} references a missing event"
                )));
            }
        }
        if self.trends.len() > MAX_TRENDS {
            return Err(LayerlineError::capacity(format!(
                "{} trends exceed the maximum of {MAX_TRENDS}",
                self.trends.len()
            )));
        }
        Ok(())
    }

    fn check_event_spec(&self, spec: &EventSpec) -> LayerlineResult<()> {
        require_label("event", &spec.label)?;
        self.require_layer(spec.layer)?;
        Ok(())
    }

    fn require_layer(&self, id: LayerId) -> LayerlineResult<usize> {
        self.layer_index(id)
            .ok_or_else(|| LayerlineError::reference(format!("unknown {id}")))
    }

    fn require_event(&self, id: EventId) -> LayerlineResult<usize> {
        self.event_index(id)
            .ok_or_else(|| LayerlineError::reference(format!("unknown {id}")))
    }

    fn reindex_layers(&mut self) {
        self.layer_pos = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, l)| (l.id, i))
            .collect();
    }

    fn reindex_events(&mut self) {
        self.event_pos = self
            .events
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id, i))
            .collect();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/diagram.rs"]
mod tests;
