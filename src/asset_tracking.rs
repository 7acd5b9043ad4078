//! Load collections of asset handles as resources.
//!
//! A resource registered through [`LoadResource`] only appears in the world
//! once every asset it depends on has finished loading, so systems can gate
//! on `resource_exists::<T>`.

use std::collections::VecDeque;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ResourceHandles>();
    app.add_systems(PreUpdate, insert_loaded_resources);
}

pub trait LoadResource {
    /// Load `T` as an [`Asset`] and insert it as a [`Resource`] when its
    /// dependencies are ready.
    fn load_resource<T: Resource + Asset + Clone + FromWorld>(&mut self) -> &mut Self;
}

impl LoadResource for App {
    fn load_resource<T: Resource + Asset + Clone + FromWorld>(&mut self) -> &mut Self {
        self.init_asset::<T>();
        let world = self.world_mut();
        let value = T::from_world(world);
        let handle = world.resource::<AssetServer>().add(value);
        world
            .resource_mut::<ResourceHandles>()
            .waiting
            .push_back((handle.untyped(), insert_resource::<T>));
        self
    }
}

fn insert_resource<T: Resource + Asset + Clone>(world: &mut World, handle: &UntypedHandle) {
    let value = world
        .resource::<Assets<T>>()
        .get(handle.id().typed::<T>())
        .cloned();
    if let Some(value) = value {
        world.insert_resource(value);
    }
}

type InsertLoadedResource = fn(&mut World, &UntypedHandle);

#[derive(Resource, Default)]
pub struct ResourceHandles {
    waiting: VecDeque<(UntypedHandle, InsertLoadedResource)>,
    finished: Vec<UntypedHandle>,
}

impl ResourceHandles {
    /// Whether every requested resource has been inserted.
    pub fn is_all_done(&self) -> bool {
        self.waiting.is_empty()
    }
}

fn insert_loaded_resources(world: &mut World) {
    world.resource_scope(|world, mut handles: Mut<ResourceHandles>| {
        for _ in 0..handles.waiting.len() {
            let Some((handle, insert)) = handles.waiting.pop_front() else {
                break;
            };
            if world
                .resource::<AssetServer>()
                .is_loaded_with_dependencies(&handle)
            {
                insert(world, &handle);
                handles.finished.push(handle);
            } else {
                handles.waiting.push_back((handle, insert));
            }
        }
    });
}
