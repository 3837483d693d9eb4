#![allow(dead_code)]

use crate::cost::{CostSummary, PRICE_PER_USER};
use crate::criteria::RecruitingCriteria;
use crate::types::{Project, ProjectStatus};

/// INV-1: before launch, the persisted tester count matches the criteria's
/// user count. Launch may overwrite the tester count on its own.
pub fn assert_counts_agree(project: &Project) {
    if project.status != ProjectStatus::Draft {
        return;
    }
    if let Some(criteria) = &project.recruiting_criteria {
        assert_eq!(
            project.target_tester_count, criteria.user_count,
            "INV-1 violated: project {} has targetTesterCount {} but criteria userCount {}",
            project.id, project.target_tester_count, criteria.user_count
        );
    }
}

/// INV-2: the cost shown is always userCount × price.
pub fn assert_cost_consistent(cost: &CostSummary) {
    assert_eq!(
        cost.total,
        cost.user_count * cost.price_per_user,
        "INV-2 violated: {} × {} != {}",
        cost.user_count,
        cost.price_per_user,
        cost.total
    );
    assert_eq!(cost.price_per_user, PRICE_PER_USER);
}

/// INV-3: a launched project carries a launch date, a draft does not.
pub fn assert_launch_date_matches_status(project: &Project) {
    match project.status {
        ProjectStatus::Draft => assert!(
            project.launch_date.is_none(),
            "INV-3 violated: draft project {} has a launch date",
            project.id
        ),
        ProjectStatus::Launched | ProjectStatus::Completed => assert!(
            project.launch_date.is_some(),
            "INV-3 violated: project {} is {} without a launch date",
            project.id,
            project.status
        ),
    }
}

/// INV-4: status never moves backwards between two observations.
pub fn assert_status_monotonic(before: ProjectStatus, after: ProjectStatus) {
    assert!(
        after >= before,
        "INV-4 violated: status went from {before} to {after}"
    );
}

/// INV-5: persisted criteria always hold a positive user count.
pub fn assert_criteria_persistable(criteria: &RecruitingCriteria) {
    assert!(
        criteria.validate().is_ok(),
        "INV-5 violated: persisted criteria fail validation: {criteria:?}"
    );
}

/// Run all stateless project invariants.
pub fn assert_all_project_invariants(project: &Project) {
    assert_counts_agree(project);
    assert_launch_date_matches_status(project);
    if let Some(criteria) = &project.recruiting_criteria {
        assert_criteria_persistable(criteria);
    }
}
