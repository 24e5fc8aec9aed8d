// A small simulator for the subset of MIPS the code generator emits. It is
// only good enough to run generated programs and capture what they print.
#![allow(dead_code)]

use std::collections::HashMap;

const STACK_TOP: i32 = 0x7fff_effc;
const DATA_BASE: i32 = 0x1001_0000;
const STEP_LIMIT: usize = 5_000_000;

#[derive(Debug)]
struct Instruction {
    op: String,
    args: Vec<String>,
}

pub struct Simulator {
    text: Vec<Instruction>,
    code_labels: HashMap<String, usize>,
    data_labels: HashMap<String, i32>,
    strings: HashMap<i32, String>,
    memory: HashMap<i32, i32>,
    registers: HashMap<String, i32>,
    hi: i32,
    lo: i32,
}

impl Simulator {
    pub fn load(asm: &str) -> Result<Self, String> {
        let mut sim = Simulator {
            text: Vec::new(),
            code_labels: HashMap::new(),
            data_labels: HashMap::new(),
            strings: HashMap::new(),
            memory: HashMap::new(),
            registers: HashMap::new(),
            hi: 0,
            lo: 0,
        };
        let mut in_data = false;
        let mut next_data = DATA_BASE;

        for raw in asm.lines() {
            let line = match raw.find('#') {
                Some(i) if !raw[..i].contains('"') => &raw[..i],
                _ => raw,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line {
                ".data" => {
                    in_data = true;
                    continue;
                }
                ".text" => {
                    in_data = false;
                    continue;
                }
                _ if line.starts_with(".globl") => continue,
                _ => {}
            }

            if in_data {
                let (label, directive) = line
                    .split_once(':')
                    .ok_or_else(|| format!("bad data line: {}", line))?;
                let directive = directive.trim();
                sim.data_labels.insert(label.trim().to_string(), next_data);
                if let Some(value) = directive.strip_prefix(".word") {
                    let value = value.trim().parse::<i32>().map_err(|e| e.to_string())?;
                    sim.memory.insert(next_data, value);
                } else if let Some(text) = directive.strip_prefix(".asciiz") {
                    let text = text.trim().trim_matches('"').replace("\\n", "\n");
                    sim.strings.insert(next_data, text);
                } else {
                    return Err(format!("unknown directive: {}", directive));
                }
                next_data += 4;
                continue;
            }

            if let Some(label) = line.strip_suffix(':') {
                sim.code_labels.insert(label.to_string(), sim.text.len());
                continue;
            }

            let cleaned = line.replace(',', " ");
            let mut parts = cleaned.split_whitespace().map(str::to_string);
            let op = parts.next().ok_or("empty instruction")?;
            sim.text.push(Instruction { op, args: parts.collect() });
        }
        Ok(sim)
    }

    fn reg(&self, name: &str) -> i32 {
        self.registers.get(name).copied().unwrap_or(0)
    }

    fn set_reg(&mut self, name: &str, value: i32) {
        self.registers.insert(name.to_string(), value);
    }

    // "8($sp)" -> address
    fn address(&self, operand: &str) -> Result<i32, String> {
        let open = operand.find('(').ok_or_else(|| format!("bad address: {}", operand))?;
        let offset = if open == 0 {
            0
        } else {
            operand[..open].parse::<i32>().map_err(|e| e.to_string())?
        };
        let base = operand[open + 1..].trim_end_matches(')');
        Ok(self.reg(base).wrapping_add(offset))
    }

    fn target(&self, label: &str) -> Result<usize, String> {
        self.code_labels
            .get(label)
            .copied()
            .ok_or_else(|| format!("undefined label {}", label))
    }

    fn imm(text: &str) -> Result<i32, String> {
        text.parse::<i32>().map_err(|e| format!("bad immediate {}: {}", text, e))
    }

    /// Runs from `main` until the exit syscall, feeding `input` line by line
    /// to integer reads. Returns everything printed.
    pub fn run(&mut self, input: &str) -> Result<String, String> {
        let mut lines = input.lines();
        let mut output = String::new();
        let mut pc = self.target("main")?;
        self.set_reg("$sp", STACK_TOP);

        for _ in 0..STEP_LIMIT {
            let instruction = self.text.get(pc).ok_or("fell off the end of the program")?;
            let op = instruction.op.clone();
            let a = instruction.args.clone();
            pc += 1;
            match op.as_str() {
                "li" => self.set_reg(&a[0], Self::imm(&a[1])?),
                "la" => {
                    let address = *self.data_labels.get(&a[1]).ok_or_else(|| format!("undefined data {}", a[1]))?;
                    self.set_reg(&a[0], address);
                }
                "lw" => {
                    let address = self.address(&a[1])?;
                    let value = self.memory.get(&address).copied().unwrap_or(0);
                    self.set_reg(&a[0], value);
                }
                "sw" => {
                    let address = self.address(&a[1])?;
                    self.memory.insert(address, self.reg(&a[0]));
                }
                "move" => self.set_reg(&a[0], self.reg(&a[1])),
                "addu" => self.set_reg(&a[0], self.reg(&a[1]).wrapping_add(self.reg(&a[2]))),
                "subu" => self.set_reg(&a[0], self.reg(&a[1]).wrapping_sub(self.reg(&a[2]))),
                "addiu" => self.set_reg(&a[0], self.reg(&a[1]).wrapping_add(Self::imm(&a[2])?)),
                "mult" => self.lo = self.reg(&a[0]).wrapping_mul(self.reg(&a[1])),
                "div" => {
                    let divisor = self.reg(&a[1]);
                    if divisor == 0 {
                        return Err("division by zero".to_string());
                    }
                    self.lo = self.reg(&a[0]).wrapping_div(divisor);
                    self.hi = self.reg(&a[0]).wrapping_rem(divisor);
                }
                "mflo" => self.set_reg(&a[0], self.lo),
                "mfhi" => self.set_reg(&a[0], self.hi),
                "beq" | "bne" | "blt" | "bgt" | "ble" | "bge" => {
                    let (l, r) = (self.reg(&a[0]), self.reg(&a[1]));
                    let taken = match op.as_str() {
                        "beq" => l == r,
                        "bne" => l != r,
                        "blt" => l < r,
                        "bgt" => l > r,
                        "ble" => l <= r,
                        _ => l >= r,
                    };
                    if taken {
                        pc = self.target(&a[2])?;
                    }
                }
                "j" => pc = self.target(&a[0])?,
                "jal" => {
                    self.set_reg("$ra", pc as i32);
                    pc = self.target(&a[0])?;
                }
                "jr" => pc = self.reg(&a[0]) as usize,
                "syscall" => match self.reg("$v0") {
                    1 => output.push_str(&self.reg("$a0").to_string()),
                    4 => {
                        let text = self
                            .strings
                            .get(&self.reg("$a0"))
                            .ok_or("print_string of unknown address")?;
                        output.push_str(text);
                    }
                    5 => {
                        let line = lines.next().ok_or("read_int past end of input")?;
                        let value = line.trim().parse::<i32>().map_err(|e| e.to_string())?;
                        self.set_reg("$v0", value);
                    }
                    10 => return Ok(output),
                    other => return Err(format!("unsupported syscall {}", other)),
                },
                other => return Err(format!("unsupported instruction {}", other)),
            }
        }
        Err("step limit exceeded".to_string())
    }

    /// Stack pointer after the run; equals the initial value when every push
    /// had a matching pop.
    pub fn stack_pointer(&self) -> i32 {
        self.reg("$sp")
    }

    pub fn initial_stack_pointer() -> i32 {
        STACK_TOP
    }
}

/// Compiles nothing itself: loads `asm` and runs it on `input`.
pub fn simulate(asm: &str, input: &str) -> Result<String, String> {
    Simulator::load(asm)?.run(input)
}
