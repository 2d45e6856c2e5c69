/// The interactive console: one line in, one response out. Stack errors
/// are non-fatal here; they are printed and the session continues.
use crate::error::ErrorKind;
use crate::object::{ObjectKind, ObjectRef};
use crate::printer::{print_heap, print_object, print_roots};
use crate::vm::Vm;

const HELP: &str = "\
commands:
  push N        allocate a scalar N and root it
  pair          pop two roots, push a pair of them
  pop           drop the top root
  gc            force a collection
  first P X     point pair P's first field at X (an object handle or nil)
  second P X    point pair P's second field at X
  stack         show the root stack
  heap          show the allocation list
  help          this text
  quit          leave";

/// A console session owning one virtual machine
pub struct Session {
    vm: Vm,
}

impl Session {
    pub fn new() -> Session {
        Session {
            vm: Vm::default().verbose(true),
        }
    }

    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    /// Drop all roots and run a final collection; the verbose VM reports
    /// what it reclaimed
    pub fn teardown(&mut self) {
        self.vm.teardown();
    }

    /// Execute one command line and return the text to show for it
    pub fn exec_line(&mut self, line: &str) -> String {
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            &[] => String::new(),

            &["push", value] => match value.parse::<i64>() {
                Ok(value) => match self.vm.push_scalar(value) {
                    Ok(obj_ref) => format!("pushed {}", print_object(self.vm.heap(), obj_ref)),
                    Err(e) => report(e.error_kind()),
                },
                Err(_) => format!("push: not an integer: {}", value),
            },

            &["pair"] => match self.vm.push_pair() {
                Ok(obj_ref) => format!("pushed {}", print_object(self.vm.heap(), obj_ref)),
                Err(e) => report(e.error_kind()),
            },

            &["pop"] => match self.vm.pop() {
                Ok(obj_ref) => format!("popped {}", obj_ref),
                Err(e) => report(e.error_kind()),
            },

            &["gc"] => {
                let stats = self.vm.collect();
                format!(
                    "reclaimed {}, surviving {}",
                    stats.reclaimed, stats.surviving
                )
            }

            &["first", pair, target] => self.rewire(pair, target, true),
            &["second", pair, target] => self.rewire(pair, target, false),

            &["stack"] => print_roots(self.vm.roots()),
            &["heap"] => print_heap(self.vm.heap()),
            &["help"] => String::from(HELP),

            _ => format!("unrecognized command: {} (try `help`)", line.trim()),
        }
    }

    /// Point one field of a live pair at another live object, or at nil
    fn rewire(&mut self, pair: &str, target: &str, first: bool) -> String {
        let pair = match self.parse_live_ref(pair) {
            Ok(obj_ref) => obj_ref,
            Err(msg) => return msg,
        };
        if let ObjectKind::Scalar(_) = self.vm.heap().get(pair).kind {
            return format!("{} is a scalar, not a pair", pair);
        }

        let target = if target == "nil" {
            None
        } else {
            match self.parse_live_ref(target) {
                Ok(obj_ref) => Some(obj_ref),
                Err(msg) => return msg,
            }
        };

        if first {
            self.vm.set_pair_first(pair, target);
        } else {
            self.vm.set_pair_second(pair, target);
        }
        print_object(self.vm.heap(), pair)
    }

    /// Parse `#3` or `3` and check the slot is live; typed-in handles
    /// may be stale after a collection
    fn parse_live_ref(&self, word: &str) -> Result<ObjectRef, String> {
        let digits = word.trim_start_matches('#');
        let index: u32 = digits
            .parse()
            .map_err(|_| format!("not an object handle: {}", word))?;

        let obj_ref = ObjectRef(index);
        match self.vm.heap().try_get(obj_ref) {
            Some(_) => Ok(obj_ref),
            None => Err(format!("{} is not a live object", obj_ref)),
        }
    }
}

fn report(kind: ErrorKind) -> String {
    format!("error: {}", kind)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn push_and_pop_round_trip() {
        let mut session = Session::new();
        session.exec_line("push 5");
        assert_eq!(session.vm().live_count(), 1);
        assert_eq!(session.vm().roots().len(), 1);

        let out = session.exec_line("pop");
        assert!(out.starts_with("popped"));
        assert!(session.vm().roots().is_empty());
    }

    #[test]
    fn pair_command_builds_a_pair() {
        let mut session = Session::new();
        session.exec_line("push 1");
        session.exec_line("push 2");
        let out = session.exec_line("pair");

        assert!(out.starts_with("pushed"), "got: {}", out);
        assert_eq!(session.vm().live_count(), 3);
        assert_eq!(session.vm().roots().len(), 1);
    }

    #[test]
    fn underflow_is_reported_not_fatal() {
        let mut session = Session::new();
        let out = session.exec_line("pop");
        assert!(out.contains("underflow"), "got: {}", out);

        // session still usable
        session.exec_line("push 1");
        assert_eq!(session.vm().live_count(), 1);
    }

    #[test]
    fn rewire_builds_a_cycle_the_collector_reclaims() {
        let mut session = Session::new();
        session.exec_line("push 1");
        session.exec_line("push 2");
        let a = session.vm().roots().get(0);
        let b = session.vm().roots().get(1);
        session.exec_line("pair");
        let p = session.vm().roots().get(0);

        // the pair holds scalar 2 in `first`; rewiring `second` from
        // scalar 1 to the pair itself makes the self-cycle
        let out = session.exec_line(&format!("second {} {}", p, p));
        assert_eq!(out, format!("{}=({} . {})", p, b, p));

        session.exec_line("pop");
        let out = session.exec_line("gc");
        assert_eq!(out, "reclaimed 3, surviving 0");
        assert!(session.vm().heap().try_get(a).is_none());
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut session = Session::new();
        session.exec_line("push 1");
        session.exec_line("push 2");
        session.exec_line("pair");
        let out = session.exec_line("first #2 #9");
        assert!(out.contains("not a live object"), "got: {}", out);
    }

    #[test]
    fn scalars_cannot_be_rewired() {
        let mut session = Session::new();
        session.exec_line("push 7");
        let scalar = session.vm().roots().get(0);
        let out = session.exec_line(&format!("first {} nil", scalar));
        assert!(out.contains("not a pair"), "got: {}", out);
    }

    #[test]
    fn unknown_commands_suggest_help() {
        let mut session = Session::new();
        let out = session.exec_line("frobnicate");
        assert!(out.contains("unrecognized"), "got: {}", out);
    }
}
