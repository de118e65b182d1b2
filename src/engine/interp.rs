//! Tree-walking interpreter for the transformed program.
//!
//! Every statement and expression step burns one unit of fuel; when the
//! budget runs out the interpreter raises a RangeError, so a runaway
//! program surfaces as an ordinary execution failure instead of hanging
//! the frame loop.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::lang::ast::*;
use crate::lang::error::LangError;

use super::record_tuple;
use super::value::{Closure, Value};
use super::EngineError;

const MAX_CALL_DEPTH: usize = 200;

/// A lexical scope. Bindings record whether they are reassignable.
pub struct Scope {
    vars: HashMap<String, Binding>,
    parent: Option<Rc<RefCell<Scope>>>,
}

struct Binding {
    value: Value,
    mutable: bool,
}

impl Scope {
    pub fn root() -> Rc<RefCell<Scope>> {
        Rc::new(RefCell::new(Scope {
            vars: HashMap::new(),
            parent: None,
        }))
    }

    pub fn child(parent: &Rc<RefCell<Scope>>) -> Rc<RefCell<Scope>> {
        Rc::new(RefCell::new(Scope {
            vars: HashMap::new(),
            parent: Some(parent.clone()),
        }))
    }

    fn declare(&mut self, name: &str, value: Value, mutable: bool) -> Result<(), EngineError> {
        if self.vars.contains_key(name) {
            return Err(LangError::syntax(
                format!("Identifier '{}' has already been declared", name),
                0,
                0,
            )
            .into());
        }
        self.vars.insert(
            name.to_string(),
            Binding { value, mutable },
        );
        Ok(())
    }

    fn lookup(env: &Rc<RefCell<Scope>>, name: &str) -> Option<Value> {
        let scope = env.borrow();
        if let Some(binding) = scope.vars.get(name) {
            return Some(binding.value.clone());
        }
        scope.parent.as_ref().and_then(|p| Scope::lookup(p, name))
    }

    fn assign(env: &Rc<RefCell<Scope>>, name: &str, value: Value) -> Result<bool, EngineError> {
        let mut scope = env.borrow_mut();
        if let Some(binding) = scope.vars.get_mut(name) {
            if !binding.mutable {
                return Err(
                    LangError::type_error("Assignment to constant variable").into()
                );
            }
            binding.value = value;
            return Ok(true);
        }
        match scope.parent.clone() {
            Some(parent) => {
                drop(scope);
                Scope::assign(&parent, name, value)
            }
            None => Ok(false),
        }
    }
}

/// Statement completion; `throw` travels as `Err`.
pub enum Completion {
    Normal,
    Return(Value),
    Break,
    Continue,
}

pub struct Interpreter {
    global: Rc<RefCell<Scope>>,
    fuel: u64,
    call_depth: usize,
}

impl Interpreter {
    pub fn new(fuel: u64) -> Self {
        Interpreter {
            global: Scope::root(),
            fuel,
            call_depth: 0,
        }
    }

    /// Inject a global binding (the polyfill and console live here).
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.global.borrow_mut().vars.insert(
            name.to_string(),
            Binding {
                value,
                mutable: false,
            },
        );
    }

    /// Run a whole program to completion.
    pub fn run(&mut self, program: &Program) -> Result<(), EngineError> {
        let env = self.global.clone();
        for stmt in &program.body {
            match self.exec_stmt(stmt, &env)? {
                Completion::Normal => {}
                Completion::Return(_) => {
                    return Err(illegal("Illegal return statement"));
                }
                Completion::Break => {
                    return Err(illegal("Illegal break statement"));
                }
                Completion::Continue => {
                    return Err(illegal("Illegal continue statement"));
                }
            }
        }
        Ok(())
    }

    fn burn(&mut self) -> Result<(), EngineError> {
        if self.fuel == 0 {
            return Err(LangError::range("Execution budget exceeded").into());
        }
        self.fuel -= 1;
        Ok(())
    }

    // ── Statements ──

    fn exec_stmt(
        &mut self,
        stmt: &Statement,
        env: &Rc<RefCell<Scope>>,
    ) -> Result<Completion, EngineError> {
        self.burn()?;
        match stmt {
            Statement::Empty => Ok(Completion::Normal),
            Statement::Expression(expr) => {
                self.eval(expr, env)?;
                Ok(Completion::Normal)
            }
            Statement::Variable(decl) => {
                for declarator in &decl.declarations {
                    let value = match &declarator.init {
                        Some(init) => self.eval(init, env)?,
                        None if decl.kind == VariableKind::Const => {
                            return Err(LangError::syntax(
                                "Missing initializer in const declaration",
                                0,
                                0,
                            )
                            .into());
                        }
                        None => Value::Undefined,
                    };
                    let mutable = decl.kind != VariableKind::Const;
                    env.borrow_mut().declare(&declarator.name, value, mutable)?;
                }
                Ok(Completion::Normal)
            }
            Statement::Block(body) => {
                let inner = Scope::child(env);
                self.exec_body(body, &inner)
            }
            Statement::If(if_stmt) => {
                if self.eval(&if_stmt.test, env)?.is_truthy() {
                    self.exec_stmt(&if_stmt.consequent, env)
                } else if let Some(alternate) = &if_stmt.alternate {
                    self.exec_stmt(alternate, env)
                } else {
                    Ok(Completion::Normal)
                }
            }
            Statement::While(while_stmt) => {
                while self.eval(&while_stmt.test, env)?.is_truthy() {
                    match self.exec_stmt(&while_stmt.body, env)? {
                        Completion::Break => break,
                        Completion::Continue | Completion::Normal => {}
                        ret @ Completion::Return(_) => return Ok(ret),
                    }
                }
                Ok(Completion::Normal)
            }
            Statement::For(for_stmt) => {
                let loop_env = Scope::child(env);
                if let Some(init) = &for_stmt.init {
                    self.exec_stmt(init, &loop_env)?;
                }
                loop {
                    if let Some(test) = &for_stmt.test {
                        if !self.eval(test, &loop_env)?.is_truthy() {
                            break;
                        }
                    }
                    match self.exec_stmt(&for_stmt.body, &loop_env)? {
                        Completion::Break => break,
                        Completion::Continue | Completion::Normal => {}
                        ret @ Completion::Return(_) => return Ok(ret),
                    }
                    if let Some(update) = &for_stmt.update {
                        self.eval(update, &loop_env)?;
                    }
                }
                Ok(Completion::Normal)
            }
            Statement::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr, env)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            Statement::Break => Ok(Completion::Break),
            Statement::Continue => Ok(Completion::Continue),
            Statement::Throw(expr) => {
                let value = self.eval(expr, env)?;
                Err(EngineError::Thrown(value))
            }
            Statement::Import(decl) => Err(LangError::syntax(
                format!("Cannot resolve module \"{}\" at run time", decl.module),
                0,
                0,
            )
            .into()),
        }
    }

    fn exec_body(
        &mut self,
        body: &[Statement],
        env: &Rc<RefCell<Scope>>,
    ) -> Result<Completion, EngineError> {
        for stmt in body {
            match self.exec_stmt(stmt, env)? {
                Completion::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal)
    }

    // ── Expressions ──

    fn eval(
        &mut self,
        expr: &Expression,
        env: &Rc<RefCell<Scope>>,
    ) -> Result<Value, EngineError> {
        self.burn()?;
        match expr {
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::String(s) => Ok(Value::String(s.clone())),
            Expression::Boolean(b) => Ok(Value::Boolean(*b)),
            Expression::Null => Ok(Value::Null),
            Expression::Identifier(name) => Scope::lookup(env, name).ok_or_else(|| {
                LangError::reference(format!("{} is not defined", name)).into()
            }),
            Expression::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval(element, env)?);
                }
                Ok(Value::array(values))
            }
            Expression::Object(props) => {
                let mut entries = Vec::with_capacity(props.len());
                for (key, value) in props {
                    entries.push((key.as_str().to_string(), self.eval(value, env)?));
                }
                Ok(Value::object(entries))
            }
            Expression::Record(props) => {
                let mut entries = Vec::with_capacity(props.len());
                for (key, value) in props {
                    entries.push((key.as_str().to_string(), self.eval(value, env)?));
                }
                record_tuple::record_constructor(&[Value::object(entries)])
            }
            Expression::Tuple(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval(element, env)?);
                }
                record_tuple::tuple_constructor(&values)
            }
            Expression::Member(member) => {
                let object = self.eval(&member.object, env)?;
                let key = self.member_key(&member.property, env)?;
                self.member_get(&object, &key)
            }
            Expression::Call(call) => {
                let callee = self.eval(&call.callee, env)?;
                let mut args = Vec::with_capacity(call.arguments.len());
                for arg in &call.arguments {
                    args.push(self.eval(arg, env)?);
                }
                self.call_value(&callee, &args)
            }
            Expression::Arrow(arrow) => Ok(Value::Closure(Rc::new(Closure {
                params: arrow.params.clone(),
                body: arrow.body.clone(),
                env: env.clone(),
            }))),
            Expression::Unary(unary) => {
                // `typeof missing` must not raise a reference error.
                if unary.op == UnaryOp::Typeof {
                    if let Expression::Identifier(name) = &unary.operand {
                        if Scope::lookup(env, name).is_none() {
                            return Ok(Value::String("undefined".to_string()));
                        }
                    }
                }
                let operand = self.eval(&unary.operand, env)?;
                match unary.op {
                    UnaryOp::Minus => Ok(Value::Number(-operand.as_number()?)),
                    UnaryOp::Plus => Ok(Value::Number(operand.as_number()?)),
                    UnaryOp::Not => Ok(Value::Boolean(!operand.is_truthy())),
                    UnaryOp::Typeof => Ok(Value::String(operand.type_of().to_string())),
                }
            }
            Expression::Binary(binary) => {
                let left = self.eval(&binary.left, env)?;
                let right = self.eval(&binary.right, env)?;
                self.eval_binary(binary.op, &left, &right)
            }
            Expression::Logical(logical) => {
                let left = self.eval(&logical.left, env)?;
                match logical.op {
                    LogicalOp::And => {
                        if left.is_truthy() {
                            self.eval(&logical.right, env)
                        } else {
                            Ok(left)
                        }
                    }
                    LogicalOp::Or => {
                        if left.is_truthy() {
                            Ok(left)
                        } else {
                            self.eval(&logical.right, env)
                        }
                    }
                }
            }
            Expression::Conditional(cond) => {
                if self.eval(&cond.test, env)?.is_truthy() {
                    self.eval(&cond.consequent, env)
                } else {
                    self.eval(&cond.alternate, env)
                }
            }
            Expression::Assignment(assign) => {
                let value = self.eval(&assign.value, env)?;
                self.assign_to(&assign.target, value.clone(), env)?;
                Ok(value)
            }
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
    ) -> Result<Value, EngineError> {
        match op {
            BinaryOp::StrictEq => Ok(Value::Boolean(left.strict_equals(right))),
            BinaryOp::StrictNe => Ok(Value::Boolean(!left.strict_equals(right))),
            BinaryOp::LooseEq => Ok(Value::Boolean(left.loose_equals(right))),
            BinaryOp::LooseNe => Ok(Value::Boolean(!left.loose_equals(right))),
            BinaryOp::Add => match (left, right) {
                (Value::String(_), _) | (_, Value::String(_)) => Ok(Value::String(format!(
                    "{}{}",
                    left.render(false),
                    right.render(false)
                ))),
                _ => Ok(Value::Number(left.as_number()? + right.as_number()?)),
            },
            BinaryOp::Sub => Ok(Value::Number(left.as_number()? - right.as_number()?)),
            BinaryOp::Mul => Ok(Value::Number(left.as_number()? * right.as_number()?)),
            BinaryOp::Div => Ok(Value::Number(left.as_number()? / right.as_number()?)),
            BinaryOp::Mod => Ok(Value::Number(left.as_number()? % right.as_number()?)),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ordering = match (left, right) {
                    (Value::String(a), Value::String(b)) => a.partial_cmp(b),
                    _ => left.as_number()?.partial_cmp(&right.as_number()?),
                };
                let result = match (op, ordering) {
                    (_, None) => false, // NaN comparisons
                    (BinaryOp::Lt, Some(o)) => o.is_lt(),
                    (BinaryOp::Le, Some(o)) => o.is_le(),
                    (BinaryOp::Gt, Some(o)) => o.is_gt(),
                    (BinaryOp::Ge, Some(o)) => o.is_ge(),
                    _ => unreachable!(),
                };
                Ok(Value::Boolean(result))
            }
        }
    }

    /// Call a function value with the given arguments.
    pub fn call_value(&mut self, callee: &Value, args: &[Value]) -> Result<Value, EngineError> {
        match callee {
            Value::Native(native) => (native.func)(args),
            Value::Closure(closure) => {
                if self.call_depth >= MAX_CALL_DEPTH {
                    return Err(
                        LangError::range("Maximum call stack size exceeded").into()
                    );
                }
                self.call_depth += 1;
                let result = self.call_closure(closure, args);
                self.call_depth -= 1;
                result
            }
            other => {
                Err(LangError::type_error(format!("{} is not a function", other.type_of()))
                    .into())
            }
        }
    }

    fn call_closure(&mut self, closure: &Closure, args: &[Value]) -> Result<Value, EngineError> {
        let env = Scope::child(&closure.env);
        for (i, param) in closure.params.iter().enumerate() {
            let value = args.get(i).cloned().unwrap_or(Value::Undefined);
            env.borrow_mut().declare(param, value, true)?;
        }
        match &closure.body {
            ArrowBody::Expr(expr) => self.eval(expr, &env),
            ArrowBody::Block(body) => match self.exec_body(body, &env)? {
                Completion::Return(value) => Ok(value),
                Completion::Normal => Ok(Value::Undefined),
                Completion::Break | Completion::Continue => {
                    Err(illegal("Illegal break or continue in function body"))
                }
            },
        }
    }

    // ── Member access ──

    fn member_key(
        &mut self,
        property: &MemberProp,
        env: &Rc<RefCell<Scope>>,
    ) -> Result<MemberKey, EngineError> {
        match property {
            MemberProp::Dot(name) => Ok(MemberKey::Name(name.clone())),
            MemberProp::Computed(index) => match self.eval(index, env)? {
                Value::Number(n) => Ok(MemberKey::Index(n)),
                Value::String(s) => Ok(MemberKey::Name(s)),
                other => Err(LangError::type_error(format!(
                    "Invalid property key of type {}",
                    other.type_of()
                ))
                .into()),
            },
        }
    }

    fn member_get(&self, object: &Value, key: &MemberKey) -> Result<Value, EngineError> {
        match object {
            Value::Undefined | Value::Null => Err(LangError::type_error(format!(
                "Cannot read properties of {} (reading '{}')",
                object.render(false),
                key.display()
            ))
            .into()),
            Value::Object(entries) => Ok(entries
                .borrow()
                .iter()
                .rev()
                .find(|(k, _)| *k == key.display())
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Undefined)),
            Value::Record(entries) => Ok(entries
                .iter()
                .find(|(k, _)| *k == key.display())
                .map(|(_, v)| v.clone())
                .unwrap_or(Value::Undefined)),
            Value::Array(elements) => match key {
                MemberKey::Name(name) if name == "length" => {
                    Ok(Value::Number(elements.borrow().len() as f64))
                }
                _ => Ok(key
                    .as_index()
                    .and_then(|i| elements.borrow().get(i).cloned())
                    .unwrap_or(Value::Undefined)),
            },
            Value::Tuple(elements) => match key {
                MemberKey::Name(name) if name == "length" => {
                    Ok(Value::Number(elements.len() as f64))
                }
                _ => Ok(key
                    .as_index()
                    .and_then(|i| elements.get(i).cloned())
                    .unwrap_or(Value::Undefined)),
            },
            Value::String(s) => match key {
                MemberKey::Name(name) if name == "length" => {
                    Ok(Value::Number(s.chars().count() as f64))
                }
                _ => Ok(key
                    .as_index()
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Value::String(c.to_string()))
                    .unwrap_or(Value::Undefined)),
            },
            _ => Ok(Value::Undefined),
        }
    }

    fn assign_to(
        &mut self,
        target: &Expression,
        value: Value,
        env: &Rc<RefCell<Scope>>,
    ) -> Result<(), EngineError> {
        match target {
            Expression::Identifier(name) => {
                if Scope::assign(env, name, value)? {
                    Ok(())
                } else {
                    Err(LangError::reference(format!("{} is not defined", name)).into())
                }
            }
            Expression::Member(member) => {
                let object = self.eval(&member.object, env)?;
                let key = self.member_key(&member.property, env)?;
                match &object {
                    Value::Object(entries) => {
                        let key = key.display().to_string();
                        let mut entries = entries.borrow_mut();
                        if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
                            entry.1 = value;
                        } else {
                            entries.push((key, value));
                        }
                        Ok(())
                    }
                    Value::Array(elements) => {
                        let index = key.as_index().ok_or_else(|| {
                            LangError::type_error("Invalid array index")
                        })?;
                        let mut elements = elements.borrow_mut();
                        while elements.len() <= index {
                            elements.push(Value::Undefined);
                        }
                        elements[index] = value;
                        Ok(())
                    }
                    Value::Record(_) | Value::Tuple(_) => Err(LangError::type_error(format!(
                        "Cannot assign to read-only property '{}' of {}",
                        key.display(),
                        object.type_of()
                    ))
                    .into()),
                    other => Err(LangError::type_error(format!(
                        "Cannot set properties of {}",
                        other.type_of()
                    ))
                    .into()),
                }
            }
            _ => Err(LangError::syntax("Invalid assignment target", 0, 0).into()),
        }
    }
}

/// Property key resolved from a member expression.
enum MemberKey {
    Name(String),
    Index(f64),
}

impl MemberKey {
    fn display(&self) -> String {
        match self {
            MemberKey::Name(name) => name.clone(),
            MemberKey::Index(n) => crate::lang::codegen::format_number(*n),
        }
    }

    fn as_index(&self) -> Option<usize> {
        match self {
            MemberKey::Index(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as usize),
            MemberKey::Name(name) => name.parse::<usize>().ok(),
            _ => None,
        }
    }
}

fn illegal(message: &str) -> EngineError {
    LangError::syntax(message, 0, 0).into()
}
