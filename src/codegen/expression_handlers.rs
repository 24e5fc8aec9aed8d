use super::{CodeEmitter, CodeGenerator};
use crate::{
    ast::{BinaryOperator, Condition, Expression, RelationalOperator},
    config::{labels, mips},
    errors::{PasError, PasResult},
};

/// Branch mnemonic taken exactly when `operator` holds for `$t0 op $v0`.
pub fn branch_mnemonic(operator: RelationalOperator) -> &'static str {
    match operator {
        RelationalOperator::Equal => "beq",
        RelationalOperator::NotEqual => "bne",
        RelationalOperator::Less => "blt",
        RelationalOperator::Greater => "bgt",
        RelationalOperator::LessEqual => "ble",
        RelationalOperator::GreaterEqual => "bge",
    }
}

impl<'ast> CodeGenerator<'ast> {
    /// Leaves the value of `expression` in the accumulator.
    pub fn compile_expression(&mut self, expression: &'ast Expression) -> PasResult<()> {
        match expression {
            Expression::Number(n) => self.emitter().emit_li(mips::ACCUMULATOR, *n),
            Expression::Variable(name) => self.emit_load_variable(name),
            Expression::Binary { operator, left, right } => {
                self.compile_operands(left, right)?;
                emit_binary_op(&mut self.emitter(), *operator)
            }
            Expression::Relational(condition) => self.compile_relational_value(condition),
            Expression::Call { name, args } => self.compile_call(name, args),
        }
    }

    // Left operand ends up in the scratch register, right in the accumulator.
    fn compile_operands(&mut self, left: &'ast Expression, right: &'ast Expression) -> PasResult<()> {
        self.compile_expression(left)?;
        self.emit_push(mips::ACCUMULATOR)?;
        self.compile_expression(right)?;
        self.emit_pop(mips::SCRATCH)
    }

    /// Emits a branch to `label` taken when `condition` is false; falls
    /// through when it is true.
    pub fn compile_condition(&mut self, condition: &'ast Condition, label: &str) -> PasResult<()> {
        self.compile_operands(&condition.left, &condition.right)?;
        let mnemonic = branch_mnemonic(condition.operator.negate());
        self.emitter().emit_branch(mnemonic, mips::SCRATCH, mips::ACCUMULATOR, label)
    }

    fn compile_relational_value(&mut self, condition: &'ast Condition) -> PasResult<()> {
        let id = self.next_label_id();
        let false_label = format!("{}{}", labels::FALSE_PREFIX, id);
        let done_label = format!("{}{}", labels::DONE_PREFIX, id);
        self.compile_condition(condition, &false_label)?;
        let mut emitter = self.emitter();
        emitter.emit_li(mips::ACCUMULATOR, 1)?;
        emitter.emit_jump(&done_label)?;
        emitter.emit_label(&false_label)?;
        emitter.emit_li(mips::ACCUMULATOR, 0)?;
        emitter.emit_label(&done_label)
    }

    /// Caller side of the calling convention: return address, return slot,
    /// then one word per declared parameter. The callee pushes its locals on
    /// top of that.
    pub fn compile_call(&mut self, name: &str, args: &'ast [Expression]) -> PasResult<()> {
        let procedure = self.lookup_procedure(name)?;
        let declared = procedure.params.len();
        if args.len() < declared {
            return Err(PasError::ArityError {
                name: name.to_string(),
                expected: declared,
                found: args.len(),
            });
        }

        self.emit_push(mips::RETURN_ADDRESS)?;
        self.emitter().emit_li(mips::ACCUMULATOR, 0)?;
        self.emit_push(mips::ACCUMULATOR)?;
        for (i, arg) in args.iter().enumerate() {
            self.compile_expression(arg)?;
            // Surplus arguments are evaluated for their effects only.
            if i < declared {
                self.emit_push(mips::ACCUMULATOR)?;
            }
        }
        self.emitter().emit_jal(&labels::procedure(name))?;
        for _ in 0..declared {
            self.emit_pop(mips::ACCUMULATOR)?;
        }
        self.emit_pop(mips::ACCUMULATOR)?;
        self.emit_pop(mips::RETURN_ADDRESS)
    }
}

// Combines scratch (left) and accumulator (right) into the accumulator.
fn emit_binary_op(emitter: &mut impl CodeEmitter, operator: BinaryOperator) -> PasResult<()> {
    let (acc, scratch) = (mips::ACCUMULATOR, mips::SCRATCH);
    match operator {
        BinaryOperator::Add => emitter.emit_addu(acc, scratch, acc),
        BinaryOperator::Subtract => emitter.emit_subu(acc, scratch, acc),
        BinaryOperator::Multiply => {
            emitter.emit_mult(scratch, acc)?;
            emitter.emit_mflo(acc)
        }
        BinaryOperator::Divide => {
            emitter.emit_div(scratch, acc)?;
            emitter.emit_mflo(acc)
        }
        BinaryOperator::Modulo => {
            emitter.emit_div(scratch, acc)?;
            emitter.emit_mfhi(acc)
        }
    }
}
