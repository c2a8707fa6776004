//! Calltips: signature + first doc line for a fixed set of builtin callables.
//!
//! The registry is static data compiled into the binary. Lookup is a pure
//! function of that table and the queried name, so it can be called from
//! anywhere without shared state.

/// One registry entry.
///
/// `signature` is `None` when the callable has no single introspectable
/// signature (the classic overloaded builtins); those render with an
/// ellipsis placeholder. Non-callable names are listed so that known
/// constants resolve to "no calltip" rather than looking like typos worth
/// a different code path.
struct Builtin {
    name: &'static str,
    callable: bool,
    signature: Option<&'static str>,
    doc: &'static str,
}

const fn func(name: &'static str, signature: &'static str, doc: &'static str) -> Builtin {
    Builtin { name, callable: true, signature: Some(signature), doc }
}

/// A callable whose signature cannot be introspected.
const fn opaque(name: &'static str, doc: &'static str) -> Builtin {
    Builtin { name, callable: true, signature: None, doc }
}

const fn value(name: &'static str) -> Builtin {
    Builtin { name, callable: false, signature: None, doc: "" }
}

/// Registry of builtin names, sorted by name (binary-searched).
const BUILTINS: &[Builtin] = &[
    value("Ellipsis"),
    value("False"),
    value("None"),
    value("NotImplemented"),
    value("True"),
    value("__debug__"),
    value("__name__"),
    func("abs", "(x, /)", "Return the absolute value of the argument."),
    func("all", "(iterable, /)", "Return True if bool(x) is True for all values x in the iterable."),
    func("any", "(iterable, /)", "Return True if bool(x) is True for any x in the iterable."),
    func("bool", "(x=False, /)", "Returns True when the argument is true, False otherwise."),
    func("callable", "(obj, /)", "Return whether the object is callable (i.e., some kind of function)."),
    func("chr", "(i, /)", "Return a Unicode string of one character with ordinal i; 0 <= i <= 0x10ffff."),
    opaque("dict", "dict() -> new empty dictionary"),
    opaque("dir", "dir([object]) -> list of strings"),
    func("divmod", "(x, y, /)", "Return the tuple (x//y, x%y)."),
    func("enumerate", "(iterable, start=0)", "Return an enumerate object."),
    func("filter", "(function, iterable, /)", "filter(function or None, iterable) --> filter object"),
    func("float", "(x=0, /)", "Convert a string or number to a floating-point number, if possible."),
    func("format", "(value, format_spec='', /)", "Return type(value).__format__(value, format_spec)."),
    opaque("getattr", "getattr(object, name[, default]) -> value"),
    func("hasattr", "(obj, name, /)", "Return whether the object has an attribute with the given name."),
    func("hash", "(obj, /)", "Return the hash value for the given object."),
    func("hex", "(number, /)", "Return the hexadecimal representation of an integer."),
    func("id", "(obj, /)", "Return the identity of an object."),
    func("input", "(prompt='', /)", "Read a string from standard input."),
    opaque("int", "int([x]) -> integer"),
    func("isinstance", "(obj, class_or_tuple, /)", "Return whether an object is an instance of a class or of a subclass thereof."),
    func("issubclass", "(cls, class_or_tuple, /)", "Return whether 'cls' is derived from another class or is the same class."),
    opaque("iter", "iter(iterable) -> iterator"),
    func("len", "(obj, /)", "Return the number of items in a container."),
    func("list", "(iterable=(), /)", "Built-in mutable sequence."),
    opaque("map", "map(func, *iterables) --> map object"),
    opaque("max", "max(iterable, *[, default=obj, key=func]) -> value"),
    opaque("min", "min(iterable, *[, default=obj, key=func]) -> value"),
    opaque("next", "next(iterator[, default])"),
    func(
        "open",
        "(file, mode='r', buffering=-1, encoding=None, errors=None, newline=None, closefd=True, opener=None)",
        "Open file and return a stream.  Raise OSError upon failure.",
    ),
    func("ord", "(c, /)", "Return the Unicode code point for a one-character string."),
    func("pow", "(base, exp, mod=None)", "Equivalent to base**exp with 2 arguments or base**exp % mod with 3 arguments."),
    func("print", "(*args, sep=' ', end='\\n', file=None, flush=False)", "Prints the values to a stream, or to sys.stdout by default."),
    opaque("range", "range(stop) -> range object"),
    func("repr", "(obj, /)", "Return the canonical string representation of the object."),
    func("reversed", "(sequence, /)", "Return a reverse iterator over the values of the given sequence."),
    func("round", "(number, ndigits=None)", "Round a number to a given precision in decimal digits."),
    opaque("set", "set() -> new empty set object"),
    func("setattr", "(obj, name, value, /)", "Sets the named attribute on the given object to the specified value."),
    func("sorted", "(iterable, /, *, key=None, reverse=False)", "Return a new list containing all items from the iterable in ascending order."),
    opaque("str", "str(object='') -> str"),
    func("sum", "(iterable, /, start=0)", "Return the sum of a 'start' value (default: 0) plus an iterable of numbers."),
    func("tuple", "(iterable=(), /)", "Built-in immutable sequence."),
    opaque("type", "type(object) -> the object's type"),
    func("zip", "(*iterables, strict=False)", "Iterate over several iterables in parallel, producing tuples with an item from each."),
];

/// Look up a calltip for `name`.
///
/// Unknown names and known-but-not-callable names both produce `None`;
/// the caller shows nothing rather than an error.
pub fn resolve(name: &str) -> Option<String> {
    let idx = BUILTINS.binary_search_by(|b| b.name.cmp(&name)).ok()?;
    let entry = &BUILTINS[idx];
    if !entry.callable {
        return None;
    }
    Some(render(entry.name, entry.signature.unwrap_or("(…)"), entry.doc))
}

/// Format `name`, signature, and the first non-empty doc line.
fn render(name: &str, signature: &str, doc: &str) -> String {
    let first = doc
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    let tip = if first.is_empty() {
        format!("{name}{signature}")
    } else {
        format!("{name}{signature}\n{first}")
    };
    tip.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_sorted_for_binary_search() {
        for pair in BUILTINS.windows(2) {
            assert!(pair[0].name < pair[1].name, "{} >= {}", pair[0].name, pair[1].name);
        }
    }

    #[test]
    fn known_callable_resolves() {
        let tip = resolve("len").unwrap();
        assert!(tip.starts_with("len"));
        assert!(tip.contains('(') && tip.contains(')'));
        assert!(tip.lines().count() == 2);
    }

    #[test]
    fn unknown_name_is_absent() {
        assert_eq!(resolve("definitely_missing_xyz"), None);
    }

    #[test]
    fn known_non_callable_is_absent() {
        assert_eq!(resolve("None"), None);
        assert_eq!(resolve("__name__"), None);
    }

    #[test]
    fn opaque_signature_uses_ellipsis() {
        let tip = resolve("range").unwrap();
        assert!(tip.starts_with("range(…)"));
    }

    #[test]
    fn doc_line_is_first_non_empty() {
        assert_eq!(render("f", "(x)", "\n\n  first line  \nsecond"), "f(x)\nfirst line");
    }

    #[test]
    fn empty_doc_omits_second_line() {
        assert_eq!(render("f", "(x)", ""), "f(x)");
        assert_eq!(render("f", "(x)", "   \n"), "f(x)");
    }
}
