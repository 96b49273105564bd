//! Processor graph construction and validation.
//!
//! Builds the canonical graph from the four declared port lists, rejecting
//! the first invariant violation in a fixed order:
//! 1. case-folded name collisions,
//! 2. predecessor names that resolve to nothing,
//! 3. cycles,
//! 4. units off every entry-to-exit path,
//! 5. exit capabilities with no all-supporting path from an entry.
//!
//! The builder is pure: the same description always produces the same
//! canonical form. Width bottlenecks are not an error; the engine treats
//! them as stall sources.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use super::graph::{Processor, Unit, UnitIdx};
use crate::common::error::{Result, SimError};
use crate::common::ident::UnitName;
use crate::config::{ProcessorDesc, UnitModel};
use crate::isa::capability::CapRegistry;

impl Processor {
    /// Validates a processor description and resolves it into the
    /// canonical index-based graph.
    pub fn build(desc: &ProcessorDesc) -> Result<Self> {
        let mut registry = CapRegistry::new();

        // Flatten the four lists in declaration order, tagging injection
        // and retirement points. Entries carry no predecessors by
        // construction; a declared sink keeps its exit role even if some
        // other unit names it as a predecessor.
        let mut raw: Vec<RawUnit> = Vec::new();
        for model in &desc.in_ports {
            raw.push(RawUnit::new(model, &[], true, false, &mut registry));
        }
        for fu in &desc.out_ports {
            raw.push(RawUnit::new(&fu.unit, &fu.preds, false, true, &mut registry));
        }
        for model in &desc.in_out_ports {
            raw.push(RawUnit::new(model, &[], true, true, &mut registry));
        }
        for fu in &desc.internal_units {
            raw.push(RawUnit::new(&fu.unit, &fu.preds, false, false, &mut registry));
        }

        // 1. Name uniqueness (case-folded).
        let mut by_name: HashMap<UnitName, usize> = HashMap::with_capacity(raw.len());
        for (i, unit) in raw.iter().enumerate() {
            if by_name.insert(unit.model.name.clone(), i).is_some() {
                return Err(SimError::DuplicateName {
                    name: unit.model.name.clone(),
                });
            }
        }

        // 2. Predecessor resolution, dropping duplicate listings.
        let mut preds: Vec<Vec<usize>> = Vec::with_capacity(raw.len());
        for unit in &raw {
            let mut seen = HashSet::new();
            let mut resolved = Vec::with_capacity(unit.pred_names.len());
            for name in &unit.pred_names {
                let Some(&p) = by_name.get(name) else {
                    return Err(SimError::DanglingPredecessor {
                        unit: unit.model.name.clone(),
                        pred: name.clone(),
                    });
                };
                if seen.insert(p) {
                    resolved.push(p);
                }
            }
            preds.push(resolved);
        }
        let mut succs: Vec<Vec<usize>> = vec![Vec::new(); raw.len()];
        for (i, ps) in preds.iter().enumerate() {
            for &p in ps {
                succs[p].push(i);
            }
        }

        // 3. Topological order (Kahn), ties broken by folded name. This is
        // the canonical unit order everything downstream indexes by.
        let order = topo_order(&raw, &preds, &succs)?;
        let mut canon_of = vec![0; raw.len()];
        for (canon, &i) in order.iter().enumerate() {
            canon_of[i] = canon;
        }

        let mut units: Vec<Unit> = order
            .iter()
            .map(|&i| {
                let mut p: Vec<UnitIdx> = preds[i].iter().map(|&x| canon_of[x]).collect();
                let mut s: Vec<UnitIdx> = succs[i].iter().map(|&x| canon_of[x]).collect();
                p.sort_unstable();
                s.sort_unstable();
                Unit {
                    model: raw[i].model.clone(),
                    preds: p,
                    succs: s,
                    viable: BTreeSet::new(),
                    entry: raw[i].entry,
                    exit: raw[i].exit,
                }
            })
            .collect();

        let entries: Vec<UnitIdx> = (0..units.len()).filter(|&u| units[u].entry).collect();
        let exits: Vec<UnitIdx> = (0..units.len()).filter(|&u| units[u].exit).collect();

        // 4. Every unit must sit on some entry-to-exit path.
        let from_entry = reach(&units, &entries, Direction::Forward);
        let to_exit = reach(&units, &exits, Direction::Backward);
        for (u, unit) in units.iter().enumerate() {
            if !from_entry[u] || !to_exit[u] {
                return Err(SimError::DeadEnd {
                    unit: unit.name().clone(),
                });
            }
        }

        // 5. Viable capabilities, back to front: a capability continues
        // from a unit iff the unit carries it and either retires it here
        // or can hand it to a successor that continues it.
        for u in (0..units.len()).rev() {
            let mut viable = BTreeSet::new();
            for cap in &units[u].model.capabilities {
                if units[u].exit || units[u].succs.iter().any(|&s| units[s].viable_for(cap)) {
                    let _ = viable.insert(cap.clone());
                }
            }
            units[u].viable = viable;
        }

        let supported: BTreeSet<_> = entries
            .iter()
            .flat_map(|&e| units[e].viable.iter().cloned())
            .collect();

        for &x in &exits {
            for cap in &units[x].model.capabilities {
                if !supported.contains(cap) {
                    return Err(SimError::UnreachableCapability {
                        capability: cap.clone(),
                    });
                }
            }
        }

        let mut mem_units: BTreeMap<_, Vec<UnitIdx>> = BTreeMap::new();
        for (u, unit) in units.iter().enumerate() {
            for cap in &unit.model.mem_access {
                mem_units.entry(cap.clone()).or_default().push(u);
            }
        }

        // Longest path in units, for the engine's cycle safety cap.
        let mut level = vec![0usize; units.len()];
        for u in 0..units.len() {
            level[u] = 1 + units[u]
                .preds
                .iter()
                .map(|&p| level[p])
                .max()
                .unwrap_or(0);
        }
        let depth = level.iter().copied().max().unwrap_or(0);
        let max_width = units.iter().map(Unit::width).max().unwrap_or(1);

        debug!(
            units = units.len(),
            entries = entries.len(),
            exits = exits.len(),
            capabilities = supported.len(),
            depth,
            "processor graph built"
        );

        Ok(Self {
            units,
            entries,
            exits,
            supported,
            mem_units,
            depth,
            max_width,
        })
    }
}

struct RawUnit {
    model: UnitModel,
    pred_names: Vec<UnitName>,
    entry: bool,
    exit: bool,
}

impl RawUnit {
    fn new(
        model: &UnitModel,
        pred_names: &[UnitName],
        entry: bool,
        exit: bool,
        registry: &mut CapRegistry,
    ) -> Self {
        // Collapse every capability spelling onto its canonical handle so
        // diagnostics agree across units.
        let mut model = model.clone();
        model.capabilities = model
            .capabilities
            .iter()
            .map(|c| registry.canonicalize(c))
            .collect();
        model.mem_access = model
            .mem_access
            .iter()
            .map(|c| registry.canonicalize(c))
            .collect();
        Self {
            model,
            pred_names: pred_names.to_vec(),
            entry,
            exit,
        }
    }
}

fn topo_order(raw: &[RawUnit], preds: &[Vec<usize>], succs: &[Vec<usize>]) -> Result<Vec<usize>> {
    let mut indegree: Vec<usize> = preds.iter().map(Vec::len).collect();
    let mut ready: BTreeMap<UnitName, usize> = indegree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(i, _)| (raw[i].model.name.clone(), i))
        .collect();

    let mut order = Vec::with_capacity(raw.len());
    while let Some((_, i)) = ready.pop_first() {
        order.push(i);
        for &s in &succs[i] {
            indegree[s] -= 1;
            if indegree[s] == 0 {
                let _ = ready.insert(raw[s].model.name.clone(), s);
            }
        }
    }

    if order.len() == raw.len() {
        Ok(order)
    } else {
        // Every leftover unit sits on (or behind) a cycle; report the
        // first by name for a stable message.
        let placed: HashSet<usize> = order.iter().copied().collect();
        let unit = raw
            .iter()
            .enumerate()
            .filter(|(i, _)| !placed.contains(i))
            .map(|(_, u)| u.model.name.clone())
            .min()
            .unwrap_or_else(|| UnitName::new(""));
        Err(SimError::CyclicPipeline { unit })
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

fn reach(units: &[Unit], roots: &[UnitIdx], dir: Direction) -> Vec<bool> {
    let mut seen = vec![false; units.len()];
    let mut stack: Vec<UnitIdx> = roots.to_vec();
    for &r in roots {
        seen[r] = true;
    }
    while let Some(u) = stack.pop() {
        let next = match dir {
            Direction::Forward => &units[u].succs,
            Direction::Backward => &units[u].preds,
        };
        for &n in next {
            if !seen[n] {
                seen[n] = true;
                stack.push(n);
            }
        }
    }
    seen
}
