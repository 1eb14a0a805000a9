// Copyright 2025 Cowboy AI, LLC.

//! Connected components of the network graph

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::network::bus::{Bus, BusData};

pub(crate) struct ComponentData {
    pub num: usize,
    pub size: usize,
    pub buses: Vec<Weak<RefCell<BusData>>>,
}

/// A connected component of the bus graph
///
/// Components are numbered by decreasing size; number zero is the main
/// component. A component is a snapshot: topology changes after its
/// computation produce new components instead of mutating it.
#[derive(Clone)]
pub struct Component {
    data: Rc<RefCell<ComponentData>>,
}

impl Component {
    pub(crate) fn new(num: usize, buses: Vec<&Bus>) -> Self {
        Self {
            data: Rc::new(RefCell::new(ComponentData {
                num,
                size: buses.len(),
                buses: buses.iter().map(|bus| bus.downgrade()).collect(),
            })),
        }
    }

    /// Number of the component; zero is the main component
    pub fn num(&self) -> usize {
        self.data.borrow().num
    }

    /// Number of buses in the component at computation time
    pub fn size(&self) -> usize {
        self.data.borrow().size
    }

    /// Buses of the component that are still alive
    pub fn buses(&self) -> Vec<Bus> {
        self.data
            .borrow()
            .buses
            .iter()
            .filter_map(|weak| weak.upgrade().map(Bus::from_data))
            .collect()
    }

    pub(crate) fn data(&self) -> &Rc<RefCell<ComponentData>> {
        &self.data
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Component {}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Component")
            .field("num", &data.num)
            .field("size", &data.size)
            .finish()
    }
}
