use crate::property::PropertyCollection;
use crate::relationship::RelationshipCollection;

/// Instance state embedded in every model struct
///
/// Holds the live properties and the relationship cache. Model structs
/// mark the field carrying it with `#[state]`.
#[derive(Debug, Clone, Default)]
pub struct ModelState {
    properties: PropertyCollection,
    relationships: RelationshipCollection,
}

impl ModelState {
    pub fn new(properties: PropertyCollection) -> Self {
        Self {
            properties,
            relationships: RelationshipCollection::new(),
        }
    }

    pub fn properties(&self) -> &PropertyCollection {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyCollection {
        &mut self.properties
    }

    pub fn relationships(&self) -> &RelationshipCollection {
        &self.relationships
    }

    pub fn relationships_mut(&mut self) -> &mut RelationshipCollection {
        &mut self.relationships
    }
}
