/// Anything stored in a domain store: it carries its own identifier.
pub trait Entity {
    type Id: Clone;

    fn id(&self) -> &Self::Id;
}

/// The surface the world engine needs from a domain store.
///
/// Implementations keep at most one entity per id. Indexing and querying are
/// left to each store.
pub trait DomainStore {
    type Entity: Entity;

    /// Insert the entity, replacing every attribute of an existing entity
    /// with the same id.
    fn update(&mut self, entity: Self::Entity);

    /// Remove every listed id. Ids that are not present are ignored.
    fn remove(&mut self, ids: &[<Self::Entity as Entity>::Id]);

    /// Remove everything.
    fn reset(&mut self);
}
