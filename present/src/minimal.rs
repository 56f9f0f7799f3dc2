use dnsdbq_types::{QueryMode, Tuple};

use crate::dedup::Deduper;

/// Emit each distinct value once across the run. RHS-style queries (by name
/// or IP) emit only the owner name; LHS-style queries (by owner) emit each
/// rdatum. Not sortable.
pub fn render(tuple: &Tuple, mode: QueryMode, deduper: &mut dyn Deduper) -> String {
    let mut out = String::new();

    if mode.is_rhs_style() {
        if !tuple.rrname.is_empty() && deduper.insert(&tuple.rrname) {
            out.push_str(&tuple.rrname);
            out.push('\n');
        }
        return out;
    }

    if let Some(rdata) = &tuple.rdata {
        for value in rdata.iter() {
            if deduper.insert(value) {
                out.push_str(value);
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::HashSetDeduper;
    use dnsdbq_types::Rdata;

    #[test]
    fn rhs_style_emits_owner_name_once() {
        let mut d = HashSetDeduper::default();
        let t = Tuple {
            rrname: "www.example.com.".to_string(),
            ..Tuple::default()
        };
        assert_eq!(render(&t, QueryMode::RdataByName, &mut d), "www.example.com.\n");
        assert_eq!(render(&t, QueryMode::RdataByName, &mut d), "");
    }

    #[test]
    fn lhs_style_emits_each_rdatum() {
        let mut d = HashSetDeduper::default();
        let t = Tuple {
            rdata: Some(Rdata::Multi(vec!["1.1.1.1".to_string(), "2.2.2.2".to_string()])),
            ..Tuple::default()
        };
        let out = render(&t, QueryMode::RrsetByName, &mut d);
        assert_eq!(out, "1.1.1.1\n2.2.2.2\n");
    }

    #[test]
    fn dedup_is_global_across_calls() {
        let mut d = HashSetDeduper::default();
        let t1 = Tuple {
            rdata: Some(Rdata::Single("1.1.1.1".to_string())),
            ..Tuple::default()
        };
        let t2 = t1.clone();
        assert_eq!(render(&t1, QueryMode::RrsetByName, &mut d), "1.1.1.1\n");
        assert_eq!(render(&t2, QueryMode::RrsetByName, &mut d), "");
    }
}

