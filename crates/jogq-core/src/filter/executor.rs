//! Applying a compiled filter to record collections.
//!
//! All variants keep the input order and stop at the first evaluation error:
//! a query that cannot be evaluated on some record never yields a partial
//! result set.

use std::borrow::Borrow;
use std::iter::FusedIterator;

use rayon::prelude::*;

use super::ast::FilterExpr;
use super::error::EvalResult;
use super::evaluator::evaluate;
use crate::record::Record;

/// Filters owned records, returning the matching ones in input order.
///
/// # Errors
///
/// Returns the first evaluation error encountered; no records are returned
/// in that case.
pub fn filter<I>(expr: &FilterExpr, records: I) -> EvalResult<Vec<Record>>
where
    I: IntoIterator<Item = Record>,
{
    filter_lazy(expr, records).collect()
}

/// Filters a slice, returning references to the matching records.
pub fn filter_records<'r>(expr: &FilterExpr, records: &'r [Record]) -> EvalResult<Vec<&'r Record>> {
    filter_lazy(expr, records).collect()
}

/// Lazily filters a source of records.
///
/// The returned iterator yields `Ok(record)` for each match. If a record
/// fails to evaluate it yields that error once and then ends. Filtering can
/// be restarted by calling this again on a fresh iterator over the source.
pub fn filter_lazy<I>(expr: &FilterExpr, source: I) -> FilterIter<'_, I::IntoIter>
where
    I: IntoIterator,
    I::Item: Borrow<Record>,
{
    FilterIter {
        expr,
        source: source.into_iter(),
        failed: false,
    }
}

/// Evaluates records on the rayon thread pool.
///
/// The expression is shared read-only between workers. Results are merged
/// back in input order and the reported error, if any, is the first one in
/// input order, so the outcome is the same as [`filter_records`].
pub fn par_filter<'r>(expr: &FilterExpr, records: &'r [Record]) -> EvalResult<Vec<&'r Record>> {
    let decisions: Vec<EvalResult<bool>> = records
        .par_iter()
        .map(|record| evaluate(expr, record))
        .collect();

    let mut matched = Vec::new();
    for (record, decision) in records.iter().zip(decisions) {
        if decision? {
            matched.push(record);
        }
    }
    tracing::debug!(
        total = records.len(),
        matched = matched.len(),
        "parallel filter finished"
    );
    Ok(matched)
}

/// Iterator returned by [`filter_lazy`].
#[derive(Debug)]
pub struct FilterIter<'a, I> {
    expr: &'a FilterExpr,
    source: I,
    failed: bool,
}

impl<I> Iterator for FilterIter<'_, I>
where
    I: Iterator,
    I::Item: Borrow<Record>,
{
    type Item = EvalResult<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        for record in self.source.by_ref() {
            match evaluate(self.expr, record.borrow()) {
                Ok(true) => return Some(Ok(record)),
                Ok(false) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

impl<I> FusedIterator for FilterIter<'_, I>
where
    I: Iterator,
    I::Item: Borrow<Record>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{ComparisonOp, EvalError, Literal};

    fn distance_gt(n: f64) -> FilterExpr {
        FilterExpr::comparison("distance", ComparisonOp::Gt, Literal::Number(n))
    }

    fn jog(id: &str, distance: i64) -> Record {
        Record::new().with("id", id).with("distance", distance)
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.get("id").unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_filter_preserves_order() {
        let records = vec![jog("c", 30), jog("a", 5), jog("b", 25), jog("d", 21)];
        let matched = filter(&distance_gt(20.0), records).unwrap();
        let ids: Vec<_> = matched
            .iter()
            .map(|r| r.get("id").unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["c", "b", "d"]);
    }

    #[test]
    fn test_filter_aborts_on_first_error() {
        let records = vec![
            jog("a", 30),
            Record::new().with("id", "b"),
            jog("c", 40),
        ];
        let err = filter(&distance_gt(20.0), records).unwrap_err();
        assert_eq!(err, EvalError::missing_field("distance"));
    }

    #[test]
    fn test_filter_records_borrows() {
        let records = vec![jog("a", 30), jog("b", 5)];
        let matched = filter_records(&distance_gt(20.0), &records).unwrap();
        assert_eq!(ids(&matched), vec!["a"]);
        assert!(std::ptr::eq(matched[0], &records[0]));
    }

    #[test]
    fn test_filter_empty_input() {
        assert!(filter(&distance_gt(1.0), Vec::new()).unwrap().is_empty());
        assert!(par_filter(&distance_gt(1.0), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_filter_lazy_is_lazy() {
        let records = vec![jog("a", 30), Record::new().with("id", "bad"), jog("c", 40)];
        let expr = distance_gt(20.0);
        let mut iter = filter_lazy(&expr, &records);

        // The first match is produced before the bad record is looked at.
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.get("id").unwrap().to_string(), "a");

        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_filter_lazy_restartable() {
        let records = vec![jog("a", 30), jog("b", 5), jog("c", 40)];
        let expr = distance_gt(20.0);

        let first: Vec<_> = filter_lazy(&expr, &records).collect::<Result<_, _>>().unwrap();
        let second: Vec<_> = filter_lazy(&expr, &records).collect::<Result<_, _>>().unwrap();
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_par_filter_matches_sequential() {
        let records: Vec<_> = (0..2000).map(|i| jog(&i.to_string(), i % 50)).collect();
        let expr = FilterExpr::or(
            distance_gt(40.0),
            FilterExpr::comparison("distance", ComparisonOp::Lt, Literal::Number(3.0)),
        );

        let sequential = filter_records(&expr, &records).unwrap();
        let parallel = par_filter(&expr, &records).unwrap();
        assert_eq!(ids(&sequential), ids(&parallel));
    }

    #[test]
    fn test_par_filter_reports_first_error_in_input_order() {
        let mut records: Vec<_> = (0..500).map(|i| jog(&i.to_string(), i)).collect();
        records[100] = Record::new().with("id", "first");
        records[400] = Record::new().with("id", "second").with("distance", "abc");

        let sequential = filter_records(&distance_gt(1.0), &records).unwrap_err();
        let parallel = par_filter(&distance_gt(1.0), &records).unwrap_err();
        assert_eq!(parallel, EvalError::missing_field("distance"));
        assert_eq!(sequential, parallel);
    }
}
