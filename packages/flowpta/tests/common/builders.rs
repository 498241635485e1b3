//! Program builders for synthetic scenarios
//!
//! Every builder declares `Main.main` as a static entry. Allocation labels
//! start at 1.

use flowpta::shared::models::{FieldRef, MethodRef};
use flowpta::{MethodBuilder, Program, ProgramBuilder};

/// `v0 = new [1]; v1 = v0; ...; v{len} = v{len-1}; test(1, v{len})`
pub fn chain_program(len: usize) -> Program {
    let mut m = MethodBuilder::new("Main", "main").static_method();
    let first = m.var("v0");
    m.alloc(1);
    m.new_obj(first, "A");
    let mut prev = first;
    for i in 1..=len {
        let next = m.var(&format!("v{i}"));
        m.copy(next, prev);
        prev = next;
    }
    m.test(1, prev);
    m.ret_void();

    let mut p = ProgramBuilder::new();
    p.method(m.build());
    p.build()
}

/// `pool` variables labeled 1..=pool, then `x = s_k` in order for each
/// k in `writes`, all in one block; `test(1, x)`
pub fn sequential_writes_program(pool: usize, writes: &[usize]) -> Program {
    let mut m = MethodBuilder::new("Main", "main").static_method();
    let vars: Vec<_> = (0..pool).map(|i| m.var(&format!("s{i}"))).collect();
    for (i, v) in vars.iter().enumerate() {
        m.alloc(i as i64 + 1);
        m.new_obj(*v, "A");
    }
    let x = m.var("x");
    for k in writes {
        m.copy(x, vars[*k]);
    }
    m.test(1, x);
    m.ret_void();

    let mut p = ProgramBuilder::new();
    p.method(m.build());
    p.build()
}

/// One branch per entry of `branches`; branch i does `x = s_{branches[i]}`
/// and all branches meet before `test(1, x)`
pub fn switch_program(pool: usize, branches: &[usize]) -> Program {
    let mut m = MethodBuilder::new("Main", "main").static_method();
    let vars: Vec<_> = (0..pool).map(|i| m.var(&format!("s{i}"))).collect();
    for (i, v) in vars.iter().enumerate() {
        m.alloc(i as i64 + 1);
        m.new_obj(*v, "A");
    }
    let x = m.var("x");

    let switch = m.if_goto(&[]);
    let mut starts = Vec::new();
    let mut gotos = Vec::new();
    for k in branches {
        starts.push(m.copy(x, vars[*k]));
        gotos.push(m.goto(&[]));
    }
    let join = m.test(1, x);
    m.ret_void();

    // branch 0 is the fallthrough of the switch
    m.set_targets(switch, &starts[1..]);
    for g in gotos {
        m.set_targets(g, &[join]);
    }

    let mut p = ProgramBuilder::new();
    p.method(m.build());
    p.build()
}

/// `a = new [1]; b = new [2]; a.f = b; c = a.f; test(1, c)`
pub fn field_roundtrip_program() -> Program {
    let mut m = MethodBuilder::new("Main", "main").static_method();
    let (a, b, c) = (m.var("a"), m.var("b"), m.var("c"));
    let f = FieldRef::new("A", "f");
    m.alloc(1);
    m.new_obj(a, "A");
    m.alloc(2);
    m.new_obj(b, "B");
    m.store(a, f.clone(), b);
    m.load(c, a, f);
    m.test(1, c);
    m.ret_void();

    let mut p = ProgramBuilder::new();
    p.method(m.build());
    p.build()
}

/// `a = new [1]; b = new [2]; r = F.f0(a); test(1, r)` where `F.f{i}(p)`
/// forwards to `F.f{i+1}(p)` and `F.f{levels-1}(p)` returns `p`
///
/// The result is `{1}` only if all `levels` calls are inlined.
pub fn forwarding_program(levels: usize) -> Program {
    assert!(levels >= 1);
    let mut p = ProgramBuilder::new();

    let mut main = MethodBuilder::new("Main", "main").static_method();
    let (a, b, r) = (main.var("a"), main.var("b"), main.var("r"));
    main.alloc(1);
    main.new_obj(a, "A");
    main.alloc(2);
    main.new_obj(b, "A");
    main.invoke_static(Some(r), MethodRef::new("F", "f0"), &[a]);
    main.test(1, r);
    main.ret_void();
    p.method(main.build());

    for i in 0..levels {
        let mut f = MethodBuilder::new("F", format!("f{i}")).static_method();
        let param = f.param("p");
        if i + 1 < levels {
            let r = f.var("r");
            f.invoke_static(Some(r), MethodRef::new("F", format!("f{}", i + 1)), &[param]);
            f.ret(r);
        } else {
            f.ret(param);
        }
        p.method(f.build());
    }
    p.build()
}
