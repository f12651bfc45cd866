use std::collections::HashMap;

use crate::{
    foundation::{
        core::Year,
        error::{LayerlineError, LayerlineResult},
    },
    timeline::{
        diagram::Diagram,
        ids::{EventId, LayerId},
        model::{Column, ConnectionStyle, EventSpec, TimelineConfig, Trend},
    },
};

/// Fluent construction of a [`Diagram`] with layers addressed by name and events by
/// insertion order.
pub struct DiagramBuilder {
    diagram: Diagram,
    layers: HashMap<String, LayerId>,
    events: Vec<EventId>,
}

impl DiagramBuilder {
    pub fn new(start_year: Year, end_year: Year) -> LayerlineResult<Self> {
        Ok(Self {
            diagram: Diagram::new(TimelineConfig::new(start_year, end_year)?),
            layers: HashMap::new(),
            events: Vec::new(),
        })
    }

    pub fn layer(mut self, name: impl Into<String>) -> LayerlineResult<Self> {
        let name = name.into();
        if self.layers.contains_key(&name) {
            return Err(LayerlineError::validation(format!(
                "duplicate layer name '{name}'"
            )));
        }
        let id = self.diagram.add_layer(name.clone())?;
        self.layers.insert(name, id);
        Ok(self)
    }

    pub fn event(self, layer: &str, label: impl Into<String>, year: Year) -> LayerlineResult<Self> {
        self.event_with(layer, label, year, |spec| spec)
    }

    /// Add an event and adjust its spec (colors, style) before insertion.
    pub fn event_with(
        mut self,
        layer: &str,
        label: impl Into<String>,
        year: Year,
        f: impl FnOnce(EventSpec) -> EventSpec,
    ) -> LayerlineResult<Self> {
        let layer_id = self.layer_id(layer)?;
        let spec = f(EventSpec::new(label, year, layer_id));
        let id = self.diagram.add_event(spec)?;
        self.events.push(id);
        Ok(self)
    }

    /// Connect events by their insertion order in this builder.
    pub fn connect(self, from: usize, to: usize) -> LayerlineResult<Self> {
        self.connect_with(from, to, ConnectionStyle::default())
    }

    pub fn connect_with(
        mut self,
        from: usize,
        to: usize,
        style: ConnectionStyle,
    ) -> LayerlineResult<Self> {
        let from = self.event_id(from)?;
        let to = self.event_id(to)?;
        self.diagram.add_connection(from, to, style)?;
        Ok(self)
    }

    pub fn column(
        mut self,
        label: impl Into<String>,
        start_year: Year,
        end_year: Year,
    ) -> LayerlineResult<Self> {
        self.diagram
            .add_column(Column::new(label, start_year, end_year))?;
        Ok(self)
    }

    pub fn trend(mut self, trend: Trend) -> LayerlineResult<Self> {
        self.diagram.add_trend(trend)?;
        Ok(self)
    }

    pub fn build(self) -> LayerlineResult<Diagram> {
        self.diagram.check_invariants()?;
        Ok(self.diagram)
    }

    fn layer_id(&self, name: &str) -> LayerlineResult<LayerId> {
        self.layers
            .get(name)
            .copied()
            .ok_or_else(|| LayerlineError::reference(format!("unknown layer name '{name}'")))
    }

    fn event_id(&self, index: usize) -> LayerlineResult<EventId> {
        self.events.get(index).copied().ok_or_else(|| {
            LayerlineError::reference(format!(
                "event {index} out of range (have {})",
                self.events.len()
            ))
        })
    }
}
