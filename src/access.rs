//! Role-based access policy.
//!
//! Two questions are answered for every operation: may this role perform
//! this action on this kind of record at all (the capability table), and
//! which records of that kind can this identity see (the scope). A scope is
//! a predicate over records; single-record requests outside it are denied
//! and list requests are filtered through it.

use uuid::Uuid;

use crate::models::{Company, EmployeeProfile, Module, Project, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Company,
    Employee,
    Project,
    Module,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Company => "company",
            Entity::Employee => "employee",
            Entity::Project => "project",
            Entity::Module => "module",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
}

use Action::{Create, Delete, Update, View};

const ALL: &[Action] = &[View, Create, Update, Delete];

/// Role to capability table. Anything not listed is denied.
const CAPABILITIES: &[(Role, Entity, &[Action])] = &[
    (Role::Admin, Entity::Company, ALL),
    (Role::Admin, Entity::Employee, ALL),
    (Role::Admin, Entity::Project, ALL),
    (Role::Admin, Entity::Module, ALL),
    (Role::TeamLeader, Entity::Employee, &[View]),
    (Role::TeamLeader, Entity::Project, &[View, Update]),
    (Role::TeamLeader, Entity::Module, &[View, Update]),
    (Role::Employee, Entity::Employee, &[View]),
    (Role::Employee, Entity::Project, &[View]),
    (Role::Employee, Entity::Module, &[View]),
];

pub fn permits(role: Role, entity: Entity, action: Action) -> bool {
    CAPABILITIES
        .iter()
        .any(|(r, e, actions)| *r == role && *e == entity && actions.contains(&action))
}

/// The records of one kind an identity can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Nothing,
    /// The identity's own employee record.
    Own(Uuid),
    /// Projects led by this employee.
    LedBy(Uuid),
    /// Projects this employee is a member of.
    MemberOf(Uuid),
    /// Modules assigned to this employee.
    AssignedTo(Uuid),
}

pub fn scope(role: Role, entity: Entity, employee_id: Uuid) -> Scope {
    match (role, entity) {
        (Role::Admin, _) => Scope::All,
        (_, Entity::Company) => Scope::Nothing,
        (_, Entity::Employee) => Scope::Own(employee_id),
        (Role::TeamLeader, Entity::Project) => Scope::LedBy(employee_id),
        (Role::Employee, Entity::Project) => Scope::MemberOf(employee_id),
        (_, Entity::Module) => Scope::AssignedTo(employee_id),
    }
}

pub trait Scoped {
    fn within(&self, scope: &Scope) -> bool;
}

impl Scoped for Company {
    fn within(&self, scope: &Scope) -> bool {
        matches!(scope, Scope::All)
    }
}

impl Scoped for EmployeeProfile {
    fn within(&self, scope: &Scope) -> bool {
        match scope {
            Scope::All => true,
            Scope::Own(id) => self.employee.id == *id,
            _ => false,
        }
    }
}

impl Scoped for Project {
    fn within(&self, scope: &Scope) -> bool {
        match scope {
            Scope::All => true,
            Scope::LedBy(id) => self.team_leader_id == *id,
            Scope::MemberOf(id) => self.team_members.contains(id),
            _ => false,
        }
    }
}

impl Scoped for Module {
    fn within(&self, scope: &Scope) -> bool {
        match scope {
            Scope::All => true,
            Scope::AssignedTo(id) => self.assignee_id == *id,
            _ => false,
        }
    }
}

impl Scope {
    pub fn filter<T: Scoped>(&self, records: Vec<T>) -> Vec<T> {
        match self {
            Scope::All => records,
            Scope::Nothing => Vec::new(),
            _ => records.into_iter().filter(|r| r.within(self)).collect(),
        }
    }
}
