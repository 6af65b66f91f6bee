use crate::provider::ProviderType;
use std::error::Error;
use std::io;
use std::iter;

/// The deepest cause inspected. Well formed chains are a handful of links
/// long; this only stops a malformed, cyclic chain from spinning forever.
pub const MAX_CAUSE_DEPTH: usize = 64;

/// The error directly underneath `link`.
///
/// `io::Error` reports the source of the error it wraps rather than the
/// wrapped error itself, so step into it explicitly.
fn next_cause<'a>(link: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
    match link.downcast_ref::<io::Error>() {
        Some(io_err) => io_err
            .get_ref()
            .map(|inner| inner as &(dyn Error + 'static)),
        None => link.source(),
    }
}

/// Find the first cause of `failure` that is an instance of `target`.
///
/// The walk starts at the immediate cause, never at `failure` itself.
pub fn find_cause<'a>(
    failure: &'a (dyn Error + 'static),
    target: &ProviderType,
) -> Option<&'a (dyn Error + 'static)> {
    iter::successors(next_cause(failure), |&cause| next_cause(cause))
        .take(MAX_CAUSE_DEPTH)
        .find(|cause| target.is_instance(*cause))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::standard::{self, GssException, KrbException};
    use crate::testkit::{bare, chain, opaque_chain, Cyclic};

    #[test]
    fn no_cause_is_not_found() {
        let target = standard::krb_exception_type();
        assert!(find_cause(&bare(), &target).is_none());
    }

    #[test]
    fn failure_itself_is_not_inspected() {
        let target = standard::krb_exception_type();
        let failure = KrbException::new(34);
        assert!(find_cause(&failure, &target).is_none());
    }

    #[test]
    fn found_at_depth() {
        let target = standard::krb_exception_type();
        for depth in [1, 2, 5] {
            let failure = chain(depth, KrbException::new(33));
            let cause = find_cause(&failure, &target)
                .unwrap_or_else(|| panic!("cause not found at depth {depth}"));
            let krb = cause
                .downcast_ref::<KrbException>()
                .expect("cause is a KrbException");
            assert_eq!(krb.return_code(), 33);
        }
    }

    #[test]
    fn absent_target_at_depth() {
        let target = standard::krb_exception_type();
        for depth in [1, 2, 5] {
            assert!(find_cause(&opaque_chain(depth), &target).is_none());
            // A different provider type is not a match either.
            let failure = chain(depth, GssException::new(GssException::FAILURE, 0));
            assert!(find_cause(&failure, &target).is_none());
        }
    }

    #[test]
    fn first_match_wins() {
        let target = standard::gss_exception_type();
        let inner = GssException::new(GssException::NO_CRED, 2);
        let outer = GssException::new(GssException::FAILURE, 1).with_cause(inner);
        let failure = chain(2, outer);

        let cause = find_cause(&failure, &target).expect("cause found");
        let gss = cause
            .downcast_ref::<GssException>()
            .expect("cause is a GssException");
        assert_eq!(gss.major(), GssException::FAILURE);
    }

    #[test]
    fn cause_inside_io_error() {
        let target = standard::krb_exception_type();

        let failure = io::Error::other(KrbException::new(34));
        let cause = find_cause(&failure, &target).expect("cause inside io::Error");
        assert_eq!(
            cause.downcast_ref::<KrbException>().map(|k| k.return_code()),
            Some(34)
        );

        let failure = chain(2, io::Error::other(KrbException::new(21)));
        let cause = find_cause(&failure, &target).expect("cause inside nested io::Error");
        assert_eq!(
            cause.downcast_ref::<KrbException>().map(|k| k.return_code()),
            Some(21)
        );

        // An io::Error with nothing wrapped ends the chain.
        let failure = chain(1, io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(find_cause(&failure, &target).is_none());
    }

    #[test]
    fn cyclic_chain_terminates() {
        let target = standard::krb_exception_type();
        assert!(find_cause(&Cyclic, &target).is_none());
        assert!(find_cause(&chain(3, Cyclic), &target).is_none());
    }

    #[test]
    fn match_beyond_depth_bound_is_not_found() {
        let target = standard::krb_exception_type();
        let failure = chain(MAX_CAUSE_DEPTH, KrbException::new(7));
        assert!(find_cause(&failure, &target).is_some());
        let failure = chain(MAX_CAUSE_DEPTH + 1, KrbException::new(7));
        assert!(find_cause(&failure, &target).is_none());
    }
}
