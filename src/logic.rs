use itertools::Itertools;
use varisat::{Lit, Var};

/// No more than `k` of `vars` are true.
///
/// Any `k + 1` of them must contain a false one: `!A + !B + ...` for every such subset.
pub(crate) fn at_most(vars: &[Var], k: usize) -> Vec<Vec<Lit>> {
    if k >= vars.len() {
        return Vec::new();
    }

    vars.iter()
        .combinations(k + 1)
        .map(|subset| subset.iter().map(|var| var.negative()).collect_vec())
        .collect_vec()
}

/// At least `k` of `vars` are true.
///
/// If fewer than `k` were true, some `len - k + 1` of them would all be false; forbid that with `A + B + ...` for every such subset.
pub(crate) fn at_least(vars: &[Var], k: usize) -> Vec<Vec<Lit>> {
    if k == 0 {
        return Vec::new();
    }
    if k > vars.len() {
        // unsatisfiable; the empty clause
        return vec![Vec::new()];
    }

    vars.iter()
        .combinations(vars.len() - k + 1)
        .map(|subset| subset.iter().map(|var| var.positive()).collect_vec())
        .collect_vec()
}

/// Exactly `k` of `vars` are true, using the binomial encoding.
///
/// The clause count is `C(m, k + 1) + C(m, m - k + 1)` for `m = vars.len()`, peaking around `k = m / 2`.
/// With `at_least_one`, the redundant clause `A + B + ...` is also emitted whenever the general encoding is used.
pub(crate) fn exactly(vars: &[Var], k: usize, at_least_one: bool) -> Vec<Vec<Lit>> {
    if k == 0 {
        // all false; !A * !B * ...
        return vars.iter().map(|var| vec![var.negative()]).collect_vec();
    }
    if vars.len() == k {
        // all true; A * B * ...
        return vars.iter().map(|var| vec![var.positive()]).collect_vec();
    }
    if vars.len() < k {
        return at_least(vars, k);
    }

    let mut clauses = at_most(vars, k);
    if at_least_one {
        clauses.push(vars.iter().map(|var| var.positive()).collect_vec());
    }
    clauses.extend(at_least(vars, k));

    clauses
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use varisat::{Lit, Var};

    use super::{at_least, at_most, exactly};

    fn satisfied(clauses: &[Vec<Lit>], mask: u32) -> bool {
        clauses.iter().all(|clause| clause.iter()
            .any(|lit| ((mask >> lit.var().index()) & 1 == 1) == lit.is_positive()))
    }

    fn vars(m: usize) -> Vec<Var> {
        (0..m).map(Var::from_index).collect_vec()
    }

    #[test]
    fn exactly_k_matches_counting() {
        for m in 0..=8 {
            for k in 0..=m {
                for with_redundant in [true, false] {
                    let clauses = exactly(&vars(m), k, with_redundant);
                    for mask in 0u32..(1 << m) {
                        assert_eq!(satisfied(&clauses, mask), mask.count_ones() as usize == k,
                                   "m={m} k={k} mask={mask:b}");
                    }
                }
            }
        }
    }

    #[test]
    fn clause_counts_are_binomial() {
        // C(4, 3) at-most clauses, C(4, 3) at-least clauses, one redundant clause
        assert_eq!(exactly(&vars(4), 2, true).len(), 4 + 4 + 1);
        // C(8, 5) either way
        assert_eq!(at_most(&vars(8), 4).len(), 56);
        assert_eq!(at_least(&vars(8), 4).len(), 56);
    }

    #[test]
    fn degenerate_bounds() {
        assert!(at_most(&vars(3), 3).is_empty());
        assert!(at_least(&vars(3), 0).is_empty());
        assert_eq!(at_least(&vars(2), 3), vec![Vec::<Lit>::new()]);
        assert!(exactly(&[], 0, true).is_empty());
    }
}
