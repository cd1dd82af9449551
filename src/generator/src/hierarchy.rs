//! Manager hierarchy construction.
//!
//! The relation is stored as child -> parent back-references only. Employees
//! are assigned in creation order and may only pick a manager among the
//! employees created before them, which keeps the relation a forest. A cycle
//! check still runs before every commit so that explicit reassignments through
//! [`ManagerRelation::set_manager`] cannot break the invariant either.

use std::collections::{HashMap, HashSet};

use common::config::HierarchyConfig;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

pub type EmployeeId = u64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("employee {0} is not part of the manager relation")]
    UnknownEmployee(EmployeeId),
    #[error("employee {0} is already part of the manager relation")]
    DuplicateEmployee(EmployeeId),
    #[error("making {manager} the manager of {employee} would create a cycle")]
    CycleDetected {
        employee: EmployeeId,
        manager: EmployeeId,
    },
}

/// Mapping from employee to optional manager, plus the creation order.
#[derive(Clone, Debug, Default)]
pub struct ManagerRelation {
    managers: HashMap<EmployeeId, Option<EmployeeId>>,
    order: Vec<EmployeeId>,
}

impl ManagerRelation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, employee: EmployeeId) -> bool {
        self.managers.contains_key(&employee)
    }

    /// Manager of `employee`; `None` for roots and unknown employees.
    pub fn manager_of(&self, employee: EmployeeId) -> Option<EmployeeId> {
        self.managers.get(&employee).copied().flatten()
    }

    /// Employees in the order they were added.
    pub fn creation_order(&self) -> &[EmployeeId] {
        &self.order
    }

    /// Append a new employee. The manager, if any, must already be present.
    pub fn push(
        &mut self,
        employee: EmployeeId,
        manager: Option<EmployeeId>,
    ) -> Result<(), HierarchyError> {
        if self.contains(employee) {
            return Err(HierarchyError::DuplicateEmployee(employee));
        }
        if let Some(manager) = manager {
            if !self.contains(manager) {
                return Err(HierarchyError::UnknownEmployee(manager));
            }
        }
        self.record(employee, manager);
        Ok(())
    }

    /// Reassign the manager of an existing employee, refusing assignments that
    /// would close a cycle.
    pub fn set_manager(
        &mut self,
        employee: EmployeeId,
        manager: Option<EmployeeId>,
    ) -> Result<(), HierarchyError> {
        if !self.contains(employee) {
            return Err(HierarchyError::UnknownEmployee(employee));
        }
        if let Some(manager) = manager {
            if !self.contains(manager) {
                return Err(HierarchyError::UnknownEmployee(manager));
            }
            if would_create_cycle(manager, employee, self) {
                return Err(HierarchyError::CycleDetected { employee, manager });
            }
        }
        self.managers.insert(employee, manager);
        Ok(())
    }

    /// Number of manager hops from `employee` up to its root.
    ///
    /// Returns `None` for unknown employees or if the chain revisits a node.
    pub fn depth(&self, employee: EmployeeId) -> Option<usize> {
        if !self.contains(employee) {
            return None;
        }
        let mut seen = HashSet::from([employee]);
        let mut depth = 0;
        let mut current = self.manager_of(employee);
        while let Some(node) = current {
            if !seen.insert(node) {
                return None;
            }
            depth += 1;
            current = self.manager_of(node);
        }
        Some(depth)
    }

    pub fn roots(&self) -> impl Iterator<Item = EmployeeId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|id| self.manager_of(*id).is_none())
    }

    fn record(&mut self, employee: EmployeeId, manager: Option<EmployeeId>) {
        if self.managers.insert(employee, manager).is_none() {
            self.order.push(employee);
        }
    }
}

/// Would making `candidate` the manager of `employee` close a cycle?
///
/// Walks up from `candidate`; meeting `employee` on the way means yes. The
/// walk stops at a root, or when a node repeats (an already-cyclic relation,
/// which the builder never produces).
pub fn would_create_cycle(
    candidate: EmployeeId,
    employee: EmployeeId,
    relation: &ManagerRelation,
) -> bool {
    let mut seen = HashSet::new();
    let mut current = Some(candidate);
    while let Some(node) = current {
        if node == employee {
            return true;
        }
        if !seen.insert(node) {
            log::warn!("Manager chain above {candidate} revisits {node}; stopping walk");
            return false;
        }
        current = relation.manager_of(node);
    }
    false
}

/// How roots are seeded and how hard the builder tries to find a manager.
#[derive(Debug, Clone)]
pub struct HierarchyPolicy {
    /// Employees with a creation index below this are always roots
    pub root_count: usize,
    /// Chance that a later employee is also made a root
    pub root_probability: f64,
    /// Candidate draws before falling back to a root
    pub max_attempts: usize,
}

impl Default for HierarchyPolicy {
    fn default() -> Self {
        Self::from(&HierarchyConfig::default())
    }
}

impl From<&HierarchyConfig> for HierarchyPolicy {
    fn from(config: &HierarchyConfig) -> Self {
        Self {
            root_count: config.root_count,
            root_probability: config.root_probability,
            max_attempts: config.max_attempts,
        }
    }
}

/// Decide the manager of the employee at `employee_index` and record it.
///
/// Candidates are drawn from the employees created before `employee_index`.
/// Falling back to no manager is silent: it happens for the leading roots,
/// by chance, or when every drawn candidate fails the cycle check.
pub fn assign_manager<R: Rng + ?Sized>(
    employee_index: usize,
    employee_id: EmployeeId,
    relation: &mut ManagerRelation,
    policy: &HierarchyPolicy,
    rng: &mut R,
) -> Option<EmployeeId> {
    let manager = choose_manager(employee_index, employee_id, relation, policy, rng);
    relation.record(employee_id, manager);
    manager
}

fn choose_manager<R: Rng + ?Sized>(
    employee_index: usize,
    employee_id: EmployeeId,
    relation: &ManagerRelation,
    policy: &HierarchyPolicy,
    rng: &mut R,
) -> Option<EmployeeId> {
    if employee_index < policy.root_count {
        return None;
    }
    if rng.gen_bool(policy.root_probability) {
        return None;
    }

    let earlier = &relation.creation_order()[..employee_index.min(relation.len())];
    for attempt in 0..policy.max_attempts {
        let candidate = *earlier.choose(rng)?;
        if !would_create_cycle(candidate, employee_id, relation) {
            return Some(candidate);
        }
        log::debug!(
            "Candidate {candidate} rejected for {employee_id} (attempt {})",
            attempt + 1
        );
    }

    log::debug!("No acyclic manager found for {employee_id}; leaving it as a root");
    None
}

/// Sequential front end over [`assign_manager`]: the creation index is the
/// number of employees assigned so far.
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    policy: HierarchyPolicy,
    relation: ManagerRelation,
}

impl HierarchyBuilder {
    pub fn new(policy: HierarchyPolicy) -> Self {
        Self {
            policy,
            relation: ManagerRelation::new(),
        }
    }

    pub fn assign<R: Rng + ?Sized>(
        &mut self,
        employee_id: EmployeeId,
        rng: &mut R,
    ) -> Option<EmployeeId> {
        let index = self.relation.len();
        assign_manager(index, employee_id, &mut self.relation, &self.policy, rng)
    }

    pub fn relation(&self) -> &ManagerRelation {
        &self.relation
    }

    pub fn into_relation(self) -> ManagerRelation {
        self.relation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn policy(root_count: usize, root_probability: f64) -> HierarchyPolicy {
        HierarchyPolicy {
            root_count,
            root_probability,
            max_attempts: 5,
        }
    }

    fn index_of(relation: &ManagerRelation) -> HashMap<EmployeeId, usize> {
        relation
            .creation_order()
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect()
    }

    #[test]
    fn test_leading_roots_then_earlier_managers() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut builder = HierarchyBuilder::new(policy(2, 0.0));

        let managers: Vec<Option<EmployeeId>> =
            (0..5).map(|id| builder.assign(id, &mut rng)).collect();

        assert_eq!(managers[0], None);
        assert_eq!(managers[1], None);
        for (index, manager) in managers.iter().enumerate().skip(2) {
            let manager = manager.expect("employee past the root count has a manager");
            assert!((manager as usize) < index);
        }

        let relation = builder.relation();
        assert_eq!(relation.roots().collect::<Vec<_>>(), vec![0, 1]);
        for id in 0..5 {
            let depth = relation.depth(id).expect("chain terminates");
            assert!(depth < 5);
        }
    }

    #[test]
    fn test_reassignment_closing_a_loop_is_detected() {
        let mut relation = ManagerRelation::new();
        for id in 0..5 {
            relation.push(id, None).unwrap();
        }
        relation.set_manager(2, Some(0)).unwrap();
        relation.set_manager(4, Some(2)).unwrap();

        assert!(would_create_cycle(4, 0, &relation));
        assert_eq!(
            relation.set_manager(0, Some(4)),
            Err(HierarchyError::CycleDetected {
                employee: 0,
                manager: 4
            })
        );
        // relation is untouched by the rejected assignment
        assert_eq!(relation.manager_of(0), None);
    }

    #[test]
    fn test_unrelated_candidate_is_not_a_cycle() {
        let mut relation = ManagerRelation::new();
        relation.push(10, None).unwrap();
        relation.push(11, Some(10)).unwrap();
        relation.push(12, None).unwrap();

        assert!(!would_create_cycle(11, 12, &relation));
        assert!(!would_create_cycle(12, 11, &relation));
        assert!(would_create_cycle(12, 12, &relation));
    }

    #[test]
    fn test_walk_stops_on_existing_cycle() {
        let mut relation = ManagerRelation::new();
        relation.record(1, Some(2));
        relation.record(2, Some(1));
        relation.record(3, None);

        assert!(!would_create_cycle(1, 3, &relation));
        assert_eq!(relation.depth(1), None);
    }

    #[test]
    fn test_push_rejects_unknown_manager_and_duplicates() {
        let mut relation = ManagerRelation::new();
        relation.push(1, None).unwrap();

        assert_eq!(
            relation.push(2, Some(99)),
            Err(HierarchyError::UnknownEmployee(99))
        );
        assert_eq!(
            relation.push(1, None),
            Err(HierarchyError::DuplicateEmployee(1))
        );
        assert_eq!(relation.len(), 1);
    }

    #[test]
    fn test_root_probability_one_makes_everyone_a_root() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut builder = HierarchyBuilder::new(policy(0, 1.0));

        for id in 0..50 {
            assert_eq!(builder.assign(id, &mut rng), None);
        }
        assert_eq!(builder.relation().roots().count(), 50);
    }

    #[test]
    fn test_zero_attempts_falls_back_to_root() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut builder = HierarchyBuilder::new(HierarchyPolicy {
            root_count: 1,
            root_probability: 0.0,
            max_attempts: 0,
        });

        builder.assign(100, &mut rng);
        assert_eq!(builder.assign(101, &mut rng), None);
    }

    #[test]
    fn test_every_candidate_cyclic_falls_back_to_root() {
        let mut relation = ManagerRelation::new();
        relation.push(1, None).unwrap();
        relation.push(2, Some(1)).unwrap();
        let policy = HierarchyPolicy {
            root_count: 0,
            root_probability: 0.0,
            max_attempts: 5,
        };

        // reassigning 1: both earlier employees are 1 itself or report to it
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut relation = relation.clone();

            assert_eq!(assign_manager(2, 1, &mut relation, &policy, &mut rng), None);
            assert_eq!(relation.manager_of(1), None);
            assert_eq!(relation.manager_of(2), Some(1));
            assert_eq!(relation.creation_order(), &[1, 2]);
        }
    }

    #[test]
    fn test_assign_manager_records_earlier_manager() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut relation = ManagerRelation::new();
        relation.push(10, None).unwrap();
        relation.push(11, Some(10)).unwrap();

        let manager = assign_manager(2, 12, &mut relation, &policy(0, 0.0), &mut rng);

        assert!(matches!(manager, Some(10) | Some(11)));
        assert_eq!(relation.manager_of(12), manager);
        assert_eq!(relation.creation_order(), &[10, 11, 12]);
    }

    #[test]
    fn test_large_relation_is_a_forest() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut builder = HierarchyBuilder::new(policy(10, 0.05));
        let count = 2_000;

        for i in 0..count {
            builder.assign(1_000_000 + i, &mut rng);
        }

        let relation = builder.into_relation();
        let index = index_of(&relation);
        for &id in relation.creation_order() {
            let depth = relation.depth(id).expect("no cycles");
            assert!(depth < count as usize);
            if let Some(manager) = relation.manager_of(id) {
                assert!(index[&manager] < index[&id]);
            }
        }
        assert!(relation.roots().count() >= 10);
    }
}
