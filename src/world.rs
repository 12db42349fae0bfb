/// Minimal entity store. Entities are plain indices and are visited in
/// creation order, which is also the draw order.
pub struct World {
    pub entities_count: usize,
    component_vecs: Vec<Box<dyn ComponentVec>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities_count: 0,
            component_vecs: Vec::new(),
        }
    }

    pub fn new_entity(&mut self) -> usize {
        let entity_id = self.entities_count;
        for component_vec in self.component_vecs.iter_mut() {
            component_vec.push_none();
        }
        self.entities_count += 1;
        entity_id
    }

    pub fn add_component_to_entity<ComponentType: 'static>(
        &mut self,
        entity: usize,
        component: ComponentType,
    ) {
        for component_vec in self.component_vecs.iter_mut() {
            if let Some(component_vec) = component_vec
                .as_any_mut()
                .downcast_mut::<Vec<Option<ComponentType>>>()
            {
                component_vec[entity] = Some(component);
                return;
            }
        }

        // No matching component storage exists yet, so we have to make one.
        let mut new_component_vec: Vec<Option<ComponentType>> =
            Vec::with_capacity(self.entities_count);
        new_component_vec.resize_with(self.entities_count, || None);
        new_component_vec[entity] = Some(component);
        self.component_vecs.push(Box::new(new_component_vec));
    }

    //  finds and borrows the ComponentVec that matches a type
    pub fn borrow_component_vec<ComponentType: 'static>(
        &self,
    ) -> Option<&Vec<Option<ComponentType>>> {
        self.component_vecs
            .iter()
            .find_map(|component_vec| component_vec.as_any().downcast_ref())
    }

    pub fn get_component<ComponentType: 'static>(&self, entity: usize) -> Option<&ComponentType> {
        if entity >= self.entities_count {
            return None;
        }

        self.borrow_component_vec::<ComponentType>()
            .and_then(|vec| vec.get(entity))
            .and_then(|option| option.as_ref())
    }

    /// Ids of entities carrying both component types, in creation order.
    pub fn query_entities_with<A: 'static, B: 'static>(&self) -> Vec<usize> {
        match (
            self.borrow_component_vec::<A>(),
            self.borrow_component_vec::<B>(),
        ) {
            (Some(a_vec), Some(b_vec)) => a_vec
                .iter()
                .zip(b_vec.iter())
                .enumerate()
                .filter(|(_, (a, b))| a.is_some() && b.is_some())
                .map(|(entity_id, _)| entity_id)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

trait ComponentVec {
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
    fn push_none(&mut self);
}

impl<T: 'static> ComponentVec for Vec<Option<T>> {
    fn as_any(&self) -> &dyn std::any::Any {
        self as &dyn std::any::Any
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self as &mut dyn std::any::Any
    }

    fn push_none(&mut self) {
        self.push(None)
    }
}
